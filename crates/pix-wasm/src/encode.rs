//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@pix/wasm';
//!
//! const bytes = encode_image(image, 'image/webp');
//! const blob = new Blob([bytes], { type: 'image/webp' });
//! ```

use crate::types::JsDecodedImage;
use pix_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode an image with the export settings for `format`.
///
/// # Arguments
///
/// * `image` - RGBA image to encode
/// * `format` - MIME type (`image/jpeg`, `image/png`, `image/webp`,
///   `image/avif`, `image/svg+xml`) or short name (`jpg`, `png`, ...)
///
/// JPEG drops alpha by compositing over black; SVG wraps a PNG raster.
///
/// # Errors
///
/// Returns an error for an unknown format, a zero dimension, or a pixel
/// buffer that does not match the dimensions.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str) -> Result<Vec<u8>, JsValue> {
    let format: OutputFormat = format
        .parse()
        .map_err(|e: encode::EncodeError| JsValue::from_str(&e.to_string()))?;
    let decoded = image.to_decoded().map_err(|e| JsValue::from_str(&e))?;
    encode::encode_image(&decoded, format).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME types accepted by [`encode_image`], in picker order.
#[wasm_bindgen]
pub fn output_formats() -> Vec<String> {
    OutputFormat::ALL
        .iter()
        .map(|format| format.mime().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats() {
        assert_eq!(
            output_formats(),
            vec![
                "image/jpeg",
                "image/png",
                "image/webp",
                "image/avif",
                "image/svg+xml"
            ]
        );
    }

    #[test]
    fn test_core_encode_through_wrapper() {
        let image = JsDecodedImage::new(4, 4, vec![90u8; 4 * 4 * 4]);
        let decoded = image.to_decoded().unwrap();

        let jpeg = encode::encode_image(&decoded, OutputFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}
