//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode any supported image from bytes (EXIF orientation applied)
//! - [`resize`] - Resize an image to exact dimensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize } from '@pix/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const small = resize(image, 640, 480, 1); // Bilinear
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use pix_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// The format is sniffed from the content (JPEG, PNG, WebP, GIF, BMP, TIFF,
/// AVIF). HEIC/HEIF must be converted first; see `JsSession.load_files`.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the data is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to exact dimensions, ignoring its aspect ratio.
///
/// # Arguments
///
/// * `image` - The source image
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// # Errors
///
/// Returns an error if either dimension is zero, the target is larger than
/// a canvas allows, or the source buffer is inconsistent with its dimensions.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    pix_core::check_dimensions(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let decoded = image.to_decoded().map_err(|e| JsValue::from_str(&e))?;
    decode::resize(&decoded, width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
