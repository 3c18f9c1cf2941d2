//! Image encoding pipeline for pix.
//!
//! This module provides functionality for:
//! - Encoding rendered images to JPEG, PNG, WebP and AVIF
//! - Wrapping a PNG raster in an SVG document
//!
//! All operations are synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use pix_core::encode::{encode_image, OutputFormat};
//!
//! let image = pix_core::DecodedImage::filled(100, 100, [128, 128, 128, 255]);
//! let bytes = encode_image(&image, OutputFormat::Png).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod format;
mod raster;
mod svg;

use thiserror::Error;
use tracing::debug;

use crate::decode::DecodedImage;

pub use format::OutputFormat;
pub use raster::{
    encode_avif, encode_jpeg, encode_png, encode_webp, DEFAULT_AVIF_QUALITY, DEFAULT_JPEG_QUALITY,
};
pub use svg::{encode_svg, svg_document};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Output format name not recognized
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// The codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an RGBA image to the given output format with export defaults.
pub fn encode_image(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    let (pixels, width, height) = (&image.pixels, image.width, image.height);
    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(pixels, width, height, DEFAULT_JPEG_QUALITY)?,
        OutputFormat::Png => encode_png(pixels, width, height)?,
        OutputFormat::Webp => encode_webp(pixels, width, height)?,
        OutputFormat::Avif => encode_avif(pixels, width, height, DEFAULT_AVIF_QUALITY)?,
        OutputFormat::Svg => encode_svg(pixels, width, height)?,
    };
    debug!(%format, width, height, size = bytes.len(), "encoded image");
    Ok(bytes)
}
