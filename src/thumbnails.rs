mod dimensions;
mod format;
mod options;
mod pipeline;
mod resampler;

pub use dimensions::scale_dimensions;
pub use format::{EncodeFormat, OutputFormat};
pub use options::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SIZE, Settings, ThumbnailOption, Thumbnailer};
pub use pipeline::Thumbnail;
pub use resampler::Resampler;
