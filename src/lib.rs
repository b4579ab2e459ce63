//! # Thumbnailer
//!
//! Generates scaled-down thumbnails from JPEG, PNG (and other decodable) images,
//! preserving the aspect ratio, and re-encodes them as JPEG or PNG.
//!
//! The entry point is [`Thumbnailer`], a reusable request built from
//! [`ThumbnailOption`]s. Options are recorded, not applied: they take effect, in order,
//! when [`Thumbnailer::create`] runs. That makes a configured `Thumbnailer` a template
//! that can be combined with a different source image per call.
//!
//! Creating a thumbnail goes through a fixed sequence of steps:
//! 1. Decode the source bytes (format detected from content).
//! 2. Resolve the output format; [`OutputFormat::Original`] follows the source.
//! 3. Compute the target size with [`scale_dimensions`].
//! 4. Resample with the configured [`Resampler`].
//! 5. Encode as JPEG (with the configured quality) or PNG.
//!
//! Any failure aborts the whole operation with a [`ThumbnailError`].
//!
//! The [`batch`] module drives the same pipeline over files on disk and backs the
//! `thumbnailer` command-line tool.
//!
//! ## Example
//!
//! ```no_run
//! use thumbnailer::{OutputFormat, Resampler, ThumbnailOption, Thumbnailer};
//!
//! # fn main() -> color_eyre::Result<()> {
//! let template = Thumbnailer::new([
//!     ThumbnailOption::MaxSize(200),
//!     ThumbnailOption::Resampler(Resampler::CatmullRom),
//! ]);
//!
//! for name in ["a.png", "b.jpg"] {
//!     let source = std::fs::read(name)?;
//!     let thumbnail = template.with(ThumbnailOption::image(&source)).create()?;
//!     std::fs::write(format!("t_{name}"), thumbnail)?;
//! }
//!
//! // Cross-format conversion with a lower JPEG quality
//! let source = std::fs::read("a.png")?;
//! let jpg = template
//!     .with(ThumbnailOption::image(&source))
//!     .with(ThumbnailOption::OutFormat(OutputFormat::Jpeg))
//!     .with(ThumbnailOption::Quality(60))
//!     .create()?;
//! std::fs::write("t_a.jpg", jpg)?;
//! # Ok(())
//! # }
//! ```

// Batch processing of files on disk, used by the CLI.
pub mod batch;
// Error types for the pipeline and the batch driver.
mod error;
// tracing subscriber setup for binaries.
pub mod logging;
// Overwrite confirmation prompts.
pub mod prompt;
// The thumbnail pipeline itself.
mod thumbnails;

pub use error::{BatchError, ThumbnailError};
pub use thumbnails::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SIZE, EncodeFormat, OutputFormat, Resampler, Settings,
    Thumbnail, ThumbnailOption, Thumbnailer, scale_dimensions,
};
