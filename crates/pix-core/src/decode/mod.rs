//! Image decoding pipeline for pix.
//!
//! This module provides functionality for:
//! - Decoding any image format the `image` crate can sniff, with EXIF orientation
//! - Routing HEIC/HEIF inputs through an external converter
//! - Scaling bitmaps to exact render dimensions
//!
//! # Architecture
//!
//! The pipeline is designed to be called from the browser through the WASM
//! bindings or from the CLI. All operations are synchronous and
//! single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use pix_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod heif;
mod reader;
mod resize;
mod types;

pub use heif::{convert_first, ConversionError, HeifConverter, NoHeifConverter, SourceKind};
pub use reader::decode_image;
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType};
