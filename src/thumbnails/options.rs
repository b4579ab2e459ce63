use crate::error::ThumbnailError;
use crate::thumbnails::format::OutputFormat;
use crate::thumbnails::pipeline::{self, Thumbnail};
use crate::thumbnails::resampler::Resampler;
use std::sync::Arc;

/// Longer-side bound used when no [`ThumbnailOption::MaxSize`] is given.
pub const DEFAULT_MAX_SIZE: u32 = 300;
/// JPEG quality used when no [`ThumbnailOption::Quality`] is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// A configuration change recorded on a [`Thumbnailer`].
///
/// Options are not validated when they are created. They are applied in order when
/// [`Thumbnailer::create`] runs, so a later option overrides an earlier one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailOption {
    /// Encoded JPG/PNG (or any decodable) source image.
    ImageData(Arc<[u8]>),
    /// Size the thumbnail's largest dimension will not exceed.
    MaxSize(u32),
    /// JPEG quality. Has no effect unless the output is JPEG.
    Quality(u8),
    OutFormat(OutputFormat),
    Resampler(Resampler),
}

impl ThumbnailOption {
    /// Source image option holding a private copy of `bytes`.
    pub fn image(bytes: impl AsRef<[u8]>) -> Self {
        ThumbnailOption::ImageData(Arc::from(bytes.as_ref()))
    }

    fn apply(&self, settings: &mut Settings) {
        match self {
            ThumbnailOption::ImageData(bytes) => settings.image = Arc::clone(bytes),
            ThumbnailOption::MaxSize(size) => settings.max_size = *size,
            ThumbnailOption::Quality(quality) => settings.jpeg_quality = *quality,
            ThumbnailOption::OutFormat(format) => settings.out_format = *format,
            ThumbnailOption::Resampler(resampler) => settings.resampler = *resampler,
        }
    }
}

/// Effective configuration of one thumbnail, after all options have been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub image: Arc<[u8]>,
    pub max_size: u32,
    pub jpeg_quality: u8,
    pub out_format: OutputFormat,
    pub resampler: Resampler,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image: Arc::default(),
            max_size: DEFAULT_MAX_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            out_format: OutputFormat::Original,
            resampler: Resampler::default(),
        }
    }
}

/// Reusable thumbnail request.
///
/// A `Thumbnailer` is a plain value: [`with`](Self::with) returns a new instance and never
/// changes the one it was called on, so one configured instance can serve as a template
/// for many images, from many threads.
///
/// ```no_run
/// use thumbnailer::{OutputFormat, ThumbnailOption, Thumbnailer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let template = Thumbnailer::new([
///     ThumbnailOption::MaxSize(200),
///     ThumbnailOption::OutFormat(OutputFormat::Jpeg),
/// ]);
/// let bytes = std::fs::read("photo.png")?;
/// let jpg = template.with(ThumbnailOption::image(&bytes)).create()?;
/// std::fs::write("t_photo.jpg", jpg)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Thumbnailer {
    options: Vec<ThumbnailOption>,
}

impl Thumbnailer {
    pub fn new(options: impl IntoIterator<Item = ThumbnailOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// Returns a copy of this thumbnailer with `option` appended.
    pub fn with(&self, option: ThumbnailOption) -> Self {
        let mut options = Vec::with_capacity(self.options.len() + 1);
        options.extend(self.options.iter().cloned());
        options.push(option);
        Self { options }
    }

    pub fn options(&self) -> &[ThumbnailOption] {
        &self.options
    }

    /// Applies the recorded options, in order, to a fresh default configuration.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        for option in &self.options {
            option.apply(&mut settings);
        }
        settings
    }

    /// Generates a thumbnail, returning the encoded image.
    ///
    /// # Errors
    ///
    /// - [`ThumbnailError::Configuration`] if the max size is zero.
    /// - [`ThumbnailError::Decode`] if no image was set or the data is not a decodable image.
    /// - [`ThumbnailError::UnsupportedFormat`] if the output format is `Original` and the
    ///   source is neither JPEG nor PNG.
    /// - [`ThumbnailError::Resample`] / [`ThumbnailError::Encode`] on internal failures.
    pub fn create(&self) -> Result<Vec<u8>, ThumbnailError> {
        self.render().map(|thumbnail| thumbnail.data)
    }

    /// Like [`create`](Self::create), but also reports the formats and size involved.
    pub fn render(&self) -> Result<Thumbnail, ThumbnailError> {
        pipeline::run(&self.settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_options() {
        let settings = Thumbnailer::default().settings();
        assert!(settings.image.is_empty());
        assert_eq!(settings.max_size, 300);
        assert_eq!(settings.jpeg_quality, 75);
        assert_eq!(settings.out_format, OutputFormat::Original);
        assert_eq!(settings.resampler, Resampler::ApproxBiLinear);
    }

    #[test]
    fn later_options_win() {
        let thumbnailer = Thumbnailer::new([
            ThumbnailOption::MaxSize(100),
            ThumbnailOption::Quality(10),
        ])
        .with(ThumbnailOption::MaxSize(50));
        let settings = thumbnailer.settings();
        assert_eq!(settings.max_size, 50);
        assert_eq!(settings.jpeg_quality, 10);
    }

    #[test]
    fn with_leaves_the_original_untouched() {
        let base = Thumbnailer::new([ThumbnailOption::MaxSize(100)]);
        let a = base.with(ThumbnailOption::OutFormat(OutputFormat::Png));
        let b = base.with(ThumbnailOption::OutFormat(OutputFormat::Jpeg));

        assert_eq!(base.options().len(), 1);
        assert_eq!(a.settings().out_format, OutputFormat::Png);
        assert_eq!(b.settings().out_format, OutputFormat::Jpeg);
        assert_eq!(base.settings().out_format, OutputFormat::Original);
    }

    #[test]
    fn image_option_copies_the_buffer() {
        let mut buffer = vec![1u8, 2, 3];
        let option = ThumbnailOption::image(&buffer);
        buffer[0] = 42;
        let settings = Thumbnailer::new([option]).settings();
        assert_eq!(&*settings.image, &[1, 2, 3]);
    }

    #[test]
    fn nonsensical_values_are_stored_as_given() {
        let settings = Thumbnailer::new([
            ThumbnailOption::MaxSize(0),
            ThumbnailOption::Quality(250),
        ])
        .settings();
        assert_eq!(settings.max_size, 0);
        assert_eq!(settings.jpeg_quality, 250);
    }

    #[test]
    fn zero_max_size_fails_at_create() {
        let err = Thumbnailer::new([ThumbnailOption::MaxSize(0)])
            .create()
            .unwrap_err();
        assert!(matches!(err, ThumbnailError::Configuration(_)));
    }

    #[test]
    fn thumbnailer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Thumbnailer>();
    }
}
