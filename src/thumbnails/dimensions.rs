//! Aspect-preserving target size calculation.
//!
//! Pure function, testable without any images.

/// Compute the size of a thumbnail whose longer side does not exceed `max_size`.
///
/// Images that already fit are returned unchanged, so no rounding error is introduced
/// when nothing needs to shrink. Otherwise both sides are multiplied by the same scale
/// factor and rounded half away from zero (`f64::round`). Each side is kept at least
/// one pixel, so extreme aspect ratios never produce an empty image.
///
/// # Examples
/// ```
/// # use thumbnailer::scale_dimensions;
/// assert_eq!(scale_dimensions(200, 500, 400), (200, 160));
/// assert_eq!(scale_dimensions(300, 120, 80), (120, 80));
/// ```
pub fn scale_dimensions(max_size: u32, width: u32, height: u32) -> (u32, u32) {
    let h_ratio = if width > max_size {
        f64::from(max_size) / f64::from(width)
    } else {
        1.0
    };
    let v_ratio = if height > max_size {
        f64::from(max_size) / f64::from(height)
    } else {
        1.0
    };

    let scale = h_ratio.min(v_ratio);
    if scale == 1.0 {
        return (width, height);
    }

    let new_width = (f64::from(width) * scale).round() as u32;
    let new_height = (f64::from(height) * scale).round() as u32;
    (new_width.max(1), new_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ratio(w: u32, h: u32) -> f64 {
        f64::from(w) / f64::from(h)
    }

    #[test]
    fn landscape_is_bound_by_width() {
        // 500x400 → longer side 200, height 400 * 0.4 = 160
        assert_eq!(scale_dimensions(200, 500, 400), (200, 160));
    }

    #[test]
    fn portrait_is_bound_by_height() {
        assert_eq!(scale_dimensions(300, 1200, 1600), (225, 300));
    }

    #[test]
    fn square_scales_evenly() {
        assert_eq!(scale_dimensions(128, 1024, 1024), (128, 128));
    }

    #[test]
    fn fitting_image_is_untouched() {
        assert_eq!(scale_dimensions(300, 300, 299), (300, 299));
        assert_eq!(scale_dimensions(300, 1, 1), (1, 1));
    }

    #[test]
    fn only_the_oversized_side_decides_the_scale() {
        // height fits, width does not
        assert_eq!(scale_dimensions(100, 400, 50), (100, 13));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 3 * (2 / 4) = 1.5 → 2
        assert_eq!(scale_dimensions(2, 4, 3), (2, 2));
    }

    #[test]
    fn extreme_aspect_ratio_keeps_one_pixel() {
        assert_eq!(scale_dimensions(10, 5000, 3), (10, 1));
        assert_eq!(scale_dimensions(10, 3, 5000), (1, 10));
    }

    #[test]
    fn typical_photo_keeps_ratio() {
        let (w, h) = scale_dimensions(300, 4032, 3024);
        assert_eq!((w, h), (300, 225));
        assert!((ratio(4032, 3024) - ratio(w, h)).abs() <= 1e-3);
    }

    proptest! {
        #[test]
        fn never_exceeds_bound(max in 1u32..2000, w in 1u32..10_000, h in 1u32..10_000) {
            let (nw, nh) = scale_dimensions(max, w, h);
            prop_assert!(nw <= max && nh <= max);
            prop_assert!(nw <= w && nh <= h);
        }

        #[test]
        fn fitting_images_are_identity(max in 1u32..2000, w in 1u32..2000, h in 1u32..2000) {
            prop_assume!(w <= max && h <= max);
            prop_assert_eq!(scale_dimensions(max, w, h), (w, h));
        }

        #[test]
        fn each_side_is_within_half_a_pixel(max in 16u32..2000, w in 1u32..10_000, h in 1u32..10_000) {
            let scale = (f64::from(max) / f64::from(w)).min(f64::from(max) / f64::from(h)).min(1.0);
            prop_assume!(f64::from(w) * scale >= 1.0 && f64::from(h) * scale >= 1.0);
            let (nw, nh) = scale_dimensions(max, w, h);
            prop_assert!((f64::from(nw) - f64::from(w) * scale).abs() <= 0.5 + 1e-9);
            prop_assert!((f64::from(nh) - f64::from(h) * scale).abs() <= 0.5 + 1e-9);
        }
    }
}
