use crate::error::ThumbnailError;
use crate::thumbnails::dimensions::scale_dimensions;
use crate::thumbnails::format::EncodeFormat;
use crate::thumbnails::options::Settings;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbaImage,
};
use std::io::Cursor;
use std::time::Instant;
use tracing::debug;

/// An encoded thumbnail together with what was decided while producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub format: EncodeFormat,
    pub source_format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Decode, scale and re-encode according to `settings`.
pub(crate) fn run(settings: &Settings) -> Result<Thumbnail, ThumbnailError> {
    if settings.max_size == 0 {
        return Err(ThumbnailError::Configuration(
            "max size must be at least 1".to_string(),
        ));
    }
    let now = Instant::now();

    let (source, source_format) = decode(&settings.image)?;
    let format = settings.out_format.resolve(source_format)?;

    let (orig_w, orig_h) = (source.width(), source.height());
    let (target_w, target_h) = scale_dimensions(settings.max_size, orig_w, orig_h);
    debug!(
        ?source_format,
        %format,
        orig_w,
        orig_h,
        target_w,
        target_h,
        resampler = %settings.resampler,
        "scaling image"
    );

    let scaled = resample(source, target_w, target_h, settings)?;
    let data = encode(scaled, format, settings.jpeg_quality)?;

    debug!(bytes = data.len(), elapsed = ?now.elapsed(), "thumbnail encoded");
    Ok(Thumbnail {
        data,
        format,
        source_format,
        width: target_w,
        height: target_h,
    })
}

/// Decode from content alone; file names play no part in format detection.
fn decode(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), ThumbnailError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::Decode(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let image = reader.decode().map_err(ThumbnailError::Decode)?;
    // decode() already fails when no format was recognised
    let format = format.ok_or_else(|| ThumbnailError::UnsupportedFormat("unknown".to_string()))?;
    Ok((image, format))
}

/// Scale onto a fresh, fully transparent RGBA canvas of the target size.
fn resample(
    source: DynamicImage,
    target_w: u32,
    target_h: u32,
    settings: &Settings,
) -> Result<RgbaImage, ThumbnailError> {
    let src_rgba8 = source.into_rgba8();
    let (orig_w, orig_h) = src_rgba8.dimensions();
    if (orig_w, orig_h) == (target_w, target_h) {
        return Ok(src_rgba8);
    }

    let src_image = Image::from_vec_u8(orig_w, orig_h, src_rgba8.into_raw(), PixelType::U8x4)
        .map_err(|e| ThumbnailError::Resample(e.to_string()))?;
    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x4);

    // Alpha is premultiplied for the filter pass and divided back out afterwards.
    let options = ResizeOptions::new().resize_alg(settings.resampler.algorithm());
    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ThumbnailError::Resample(e.to_string()))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec()).ok_or_else(|| {
        ThumbnailError::Resample("resized buffer does not match target dimensions".to_string())
    })
}

fn encode(image: RgbaImage, format: EncodeFormat, quality: u8) -> Result<Vec<u8>, ThumbnailError> {
    let (width, height) = image.dimensions();
    let mut output = Cursor::new(Vec::new());
    let encoded = match format {
        EncodeFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
            JpegEncoder::new_with_quality(&mut output, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        EncodeFormat::Png => PngEncoder::new(&mut output).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    encoded.map_err(|source| ThumbnailError::Encode { format, source })?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnails::format::OutputFormat;
    use crate::thumbnails::resampler::Resampler;
    use image::{GenericImageView, Rgba};
    use std::sync::Arc;

    fn encoded(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, format)
            .unwrap();
        bytes.into_inner()
    }

    fn settings_for(bytes: Vec<u8>) -> Settings {
        Settings {
            image: Arc::from(bytes),
            ..Settings::default()
        }
    }

    #[test]
    fn keeps_alpha_for_png() -> color_eyre::Result<()> {
        let source = RgbaImage::from_pixel(400, 200, Rgba([10, 200, 30, 0]));
        let settings = Settings {
            out_format: OutputFormat::Png,
            ..settings_for(encoded(source, ImageFormat::Png))
        };
        let thumbnail = run(&settings)?;
        assert_eq!((thumbnail.width, thumbnail.height), (300, 150));

        let decoded = image::load_from_memory(&thumbnail.data)?;
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.get_pixel(10, 10)[3], 0);
        Ok(())
    }

    #[test]
    fn jpeg_output_is_opaque_rgb() -> color_eyre::Result<()> {
        let source = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 128]));
        let settings = Settings {
            out_format: OutputFormat::Jpeg,
            max_size: 32,
            ..settings_for(encoded(source, ImageFormat::Png))
        };
        let thumbnail = run(&settings)?;
        assert_eq!(thumbnail.format, EncodeFormat::Jpeg);
        assert_eq!(thumbnail.source_format, ImageFormat::Png);

        let decoded = image::load_from_memory_with_format(&thumbnail.data, ImageFormat::Jpeg)?;
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.dimensions(), (32, 32));
        Ok(())
    }

    #[test]
    fn every_resampler_produces_the_target_size() -> color_eyre::Result<()> {
        let source = RgbaImage::from_fn(90, 60, |x, y| Rgba([x as u8, y as u8, 128, 255]));
        let bytes = encoded(source, ImageFormat::Png);
        for resampler in Resampler::ALL {
            let settings = Settings {
                max_size: 30,
                resampler,
                ..settings_for(bytes.clone())
            };
            let thumbnail = run(&settings)?;
            let decoded = image::load_from_memory(&thumbnail.data)?;
            assert_eq!(decoded.dimensions(), (30, 20), "{resampler}");
        }
        Ok(())
    }

    #[test]
    fn fitting_image_keeps_its_pixels() -> color_eyre::Result<()> {
        let source = RgbaImage::from_fn(16, 8, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        let thumbnail = run(&settings_for(encoded(source.clone(), ImageFormat::Png)))?;
        let decoded = image::load_from_memory(&thumbnail.data)?.into_rgba8();
        assert_eq!(decoded, source);
        Ok(())
    }

    #[test]
    fn gif_source_needs_an_explicit_format() -> color_eyre::Result<()> {
        let source = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255]));
        let bytes = encoded(source, ImageFormat::Gif);

        let err = run(&settings_for(bytes.clone())).unwrap_err();
        assert!(matches!(err, ThumbnailError::UnsupportedFormat(ref f) if f == "gif"));

        let settings = Settings {
            out_format: OutputFormat::Png,
            ..settings_for(bytes)
        };
        let thumbnail = run(&settings)?;
        assert_eq!(thumbnail.source_format, ImageFormat::Gif);
        assert_eq!(thumbnail.format, EncodeFormat::Png);
        Ok(())
    }

    #[test]
    fn empty_source_is_a_decode_error() {
        let err = run(&Settings::default()).unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode(_)));
    }

    #[test]
    fn truncated_source_is_a_decode_error() {
        let source = RgbaImage::from_pixel(50, 50, Rgba([1, 2, 3, 255]));
        let mut bytes = encoded(source, ImageFormat::Png);
        bytes.truncate(bytes.len() / 2);
        let err = run(&settings_for(bytes)).unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode(_)));
    }
}
