use crate::error::ThumbnailError;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format requested by the caller.
///
/// `Original` defers the decision until the source has been decoded; see [`EncodeFormat`]
/// for the concrete format that is actually written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Original,
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension for thumbnails written in this format. `None` keeps the input's extension.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            OutputFormat::Original => None,
            OutputFormat::Jpeg => Some("jpg"),
            OutputFormat::Png => Some("png"),
        }
    }

    /// Pick the format that will actually be encoded for a source detected as `detected`.
    pub fn resolve(self, detected: ImageFormat) -> Result<EncodeFormat, ThumbnailError> {
        match self {
            OutputFormat::Jpeg => Ok(EncodeFormat::Jpeg),
            OutputFormat::Png => Ok(EncodeFormat::Png),
            OutputFormat::Original => match detected {
                ImageFormat::Jpeg => Ok(EncodeFormat::Jpeg),
                ImageFormat::Png => Ok(EncodeFormat::Png),
                other => Err(ThumbnailError::UnsupportedFormat(format_name(other))),
            },
        }
    }
}

/// Numeric codes `0 = original`, `1 = jpeg`, `2 = png`. Anything else falls back to
/// `Original` instead of failing.
impl From<u8> for OutputFormat {
    fn from(value: u8) -> Self {
        match value {
            1 => OutputFormat::Jpeg,
            2 => OutputFormat::Png,
            _ => OutputFormat::Original,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(OutputFormat::Original),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(ThumbnailError::Configuration(format!(
                "invalid output format '{s}'"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Original => "original",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        })
    }
}

/// A format with an encoder behind it. Never ambiguous, unlike [`OutputFormat::Original`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodeFormat {
    Jpeg,
    Png,
}

impl EncodeFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            EncodeFormat::Jpeg => ImageFormat::Jpeg,
            EncodeFormat::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for EncodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodeFormat::Jpeg => "jpeg",
            EncodeFormat::Png => "png",
        })
    }
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| format!("{format:?}").to_lowercase())
}
