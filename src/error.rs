use crate::thumbnails::EncodeFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while producing a single thumbnail.
///
/// Every variant aborts the whole `create` call; no partial output is ever returned.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("invalid image format '{0}'")]
    UnsupportedFormat(String),
    #[error("failed to resample image: {0}")]
    Resample(String),
    #[error("failed to encode {format} thumbnail: {source}")]
    Encode {
        format: EncodeFormat,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised by the batch driver. Per-file failures carry the input path.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{0}")]
    InvalidSettings(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Thumbnail {
        path: PathBuf,
        #[source]
        source: ThumbnailError,
    },
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid settings file {}: {source}", path.display())]
    SettingsFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BatchError::Io {
            path: path.into(),
            source,
        }
    }
}
