//! Image scaling to exact render dimensions.
//!
//! Uses the `image` crate's resampling filters. The input is never modified;
//! a new `DecodedImage` is returned.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions, ignoring the source aspect ratio.
///
/// This is the equivalent of drawing the bitmap onto a canvas of
/// `width x height` pixels: the image is stretched to fill it.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` if a target dimension is zero and
/// `DecodeError::CorruptedFile` if the source buffer is inconsistent.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image
        .as_rgba_view()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer does not match dimensions".into()))?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_image;

    #[test]
    fn test_resize_basic() {
        let img = gradient_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions_is_identity() {
        let img = gradient_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_ignores_aspect_ratio() {
        let img = gradient_image(100, 50);
        let resized = resize(&img, 30, 90, FilterType::Bilinear).unwrap();

        assert_eq!((resized.width, resized.height), (30, 90));
    }

    #[test]
    fn test_resize_upscale() {
        let img = gradient_image(50, 25);
        let resized = resize(&img, 100, 50, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = gradient_image(100, 50);

        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_keeps_alpha() {
        let img = DecodedImage::filled(4, 4, [10, 20, 30, 0]);
        let resized = resize(&img, 2, 2, FilterType::Bilinear).unwrap();

        assert!(resized.pixels.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn test_all_filter_types() {
        let img = gradient_image(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&img, 50, 25, filter).unwrap();
            assert_eq!(resized.width, 50);
            assert_eq!(resized.height, 25);
        }
    }
}
