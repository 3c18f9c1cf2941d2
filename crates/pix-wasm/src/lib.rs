//! pix WASM - WebAssembly bindings for pix
//!
//! This crate exposes the pix-core session, render pipeline, and encoders
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The editing session: loading, selection, parameters, preview, export
//! - `adjustments` - Brightness, contrast, saturation
//! - `types` - WASM-compatible wrapper types for images and downloads
//! - `decode` - Image decoding and resize bindings
//! - `encode` - Output format encoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession } from '@pix/wasm';
//!
//! await init();
//!
//! const session = new JsSession();
//! session.load_files(files.map(f => f.name), blobs, heicToPng);
//! session.set_format('image/webp');
//! const download = session.export(Date.now());
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod decode;
mod encode;
mod log;
mod session;
mod types;

// Re-export public types
pub use adjustments::{apply_fine_tune, JsFineTune};
pub use decode::{decode_image, resize};
pub use encode::{encode_image, output_formats};
pub use session::JsSession;
pub use types::{JsDecodedImage, JsDownload, JsRenderedImage};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
