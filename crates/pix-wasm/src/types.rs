//! WASM-compatible wrapper types for images and downloads.
//!
//! These wrap the core pix types and handle the conversion between Rust and
//! JavaScript data representations.

use pix_core::decode::{DecodedImage, FilterType};
use pix_core::{Download, ExportFailure};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. The `free()` method can be called to
/// release WASM memory early; wasm-bindgen's finalizer handles it otherwise.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array, ready for `new ImageData(...)`.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage, checking the buffer length.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_decoded(&self) -> Result<DecodedImage, String> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(format!(
                "Invalid pixel data: expected {expected} bytes, got {}",
                self.pixels.len()
            ));
        }
        Ok(DecodedImage::new(self.width, self.height, self.pixels.clone()))
    }
}

/// One preview frame: the selected asset rendered with the current parameters.
#[wasm_bindgen]
pub struct JsRenderedImage {
    asset_index: usize,
    image: JsDecodedImage,
    filter: String,
}

#[wasm_bindgen]
impl JsRenderedImage {
    /// Index of the rendered asset in the session.
    #[wasm_bindgen(getter)]
    pub fn asset_index(&self) -> usize {
        self.asset_index
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.image.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Rendered RGBA pixels, fine-tune already applied.
    pub fn pixels(&self) -> Vec<u8> {
        self.image.pixels.clone()
    }

    /// CSS filter string equivalent to the applied fine-tune.
    #[wasm_bindgen(getter)]
    pub fn filter(&self) -> String {
        self.filter.clone()
    }
}

impl JsRenderedImage {
    pub(crate) fn new(asset_index: usize, image: &DecodedImage, filter: String) -> Self {
        Self {
            asset_index,
            image: JsDecodedImage::from_decoded(image.clone()),
            filter,
        }
    }
}

/// The file produced by an export, plus any per-asset failures.
#[wasm_bindgen]
pub struct JsDownload {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
    failures: Vec<String>,
}

#[wasm_bindgen]
impl JsDownload {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    /// File contents, for `new Blob([bytes], { type: mime })`.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// One `"<name>: <error>"` line per asset left out of the export.
    #[wasm_bindgen(getter)]
    pub fn failures(&self) -> Vec<String> {
        self.failures.clone()
    }
}

impl JsDownload {
    pub(crate) fn new(download: Download, failures: &[ExportFailure]) -> Self {
        Self {
            file_name: download.file_name,
            mime: download.mime,
            bytes: download.bytes,
            failures: failure_lines(failures),
        }
    }
}

pub(crate) fn failure_lines(failures: &[ExportFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.name, f.error))
        .collect()
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (what the preview and export use)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::ExportError;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_to_decoded_checks_length() {
        let good = JsDecodedImage::new(2, 2, vec![1u8; 16]);
        assert_eq!(good.to_decoded().unwrap().pixel_count(), 4);

        let bad = JsDecodedImage::new(2, 2, vec![1u8; 12]);
        assert!(bad.to_decoded().is_err());
    }

    #[test]
    fn test_from_decoded() {
        let js_img = JsDecodedImage::from_decoded(DecodedImage::filled(20, 10, [0, 0, 0, 255]));
        assert_eq!(js_img.width(), 20);
        assert_eq!(js_img.byte_length(), 800);
    }

    #[test]
    fn test_download_failures() {
        let download = Download {
            file_name: "pix-batch-1.zip".into(),
            mime: "application/zip".into(),
            bytes: vec![1, 2, 3],
        };
        let failures = vec![ExportFailure {
            name: "b.jpg".into(),
            error: ExportError::NoAssets,
        }];

        let js = JsDownload::new(download, &failures);
        assert_eq!(js.file_name(), "pix-batch-1.zip");
        assert_eq!(js.bytes(), vec![1, 2, 3]);
        assert_eq!(js.failures(), vec!["b.jpg: nothing to export".to_string()]);
    }

    #[test]
    fn test_filter_from_u8() {
        assert!(matches!(filter_from_u8(0), FilterType::Nearest));
        assert!(matches!(filter_from_u8(1), FilterType::Bilinear));
        assert!(matches!(filter_from_u8(2), FilterType::Lanczos3));
        assert!(matches!(filter_from_u8(255), FilterType::Bilinear));
    }
}
