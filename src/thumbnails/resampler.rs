use crate::error::ThumbnailError;
use fast_image_resize::{FilterType, ResizeAlg};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scaling algorithm used when shrinking the source pixels.
///
/// Ordered roughly from fastest to highest quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resampler {
    NearestNeighbor,
    /// Plain bilinear interpolation without widening the kernel when downscaling.
    #[default]
    ApproxBiLinear,
    /// Bilinear convolution over the full footprint of each destination pixel.
    BiLinear,
    CatmullRom,
}

impl Resampler {
    pub const ALL: [Resampler; 4] = [
        Resampler::NearestNeighbor,
        Resampler::ApproxBiLinear,
        Resampler::BiLinear,
        Resampler::CatmullRom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resampler::NearestNeighbor => "NearestNeighbor",
            Resampler::ApproxBiLinear => "ApproxBiLinear",
            Resampler::BiLinear => "BiLinear",
            Resampler::CatmullRom => "CatmullRom",
        }
    }

    pub(crate) fn algorithm(self) -> ResizeAlg {
        match self {
            Resampler::NearestNeighbor => ResizeAlg::Nearest,
            Resampler::ApproxBiLinear => ResizeAlg::Interpolation(FilterType::Bilinear),
            Resampler::BiLinear => ResizeAlg::Convolution(FilterType::Bilinear),
            Resampler::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
        }
    }
}

impl FromStr for Resampler {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resampler::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ThumbnailError::Configuration(format!("invalid scaler '{s}'")))
    }
}

impl fmt::Display for Resampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
