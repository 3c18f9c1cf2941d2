//! Fine-tune WASM bindings.
//!
//! [`JsFineTune`] mirrors the core `FineTune` values so TypeScript can keep
//! slider state, and [`apply_fine_tune`] runs the same filter chain the
//! session uses for preview and export.

use crate::types::JsDecodedImage;
use pix_core::FineTune;
use wasm_bindgen::prelude::*;

/// Brightness, contrast, and saturation percentages for JavaScript.
#[wasm_bindgen]
pub struct JsFineTune {
    inner: FineTune,
}

impl Default for JsFineTune {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsFineTune {
    /// All values at 100%.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: FineTune::default(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> u16 {
        self.inner.brightness()
    }

    /// Values outside [0, 200] are clamped.
    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        self.inner.set_brightness(value as i64);
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> u16 {
        self.inner.contrast()
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        self.inner.set_contrast(value as i64);
    }

    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> u16 {
        self.inner.saturation()
    }

    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: i32) {
        self.inner.set_saturation(value as i64);
    }

    /// Whether every value is neutral.
    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// CSS filter string, e.g. for `ctx.filter`.
    pub fn filter_string(&self) -> String {
        self.inner.filter_string()
    }
}

/// Apply fine-tuning to an image and return a new image.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions.
#[wasm_bindgen]
pub fn apply_fine_tune(
    image: &JsDecodedImage,
    fine_tune: &JsFineTune,
) -> Result<JsDecodedImage, JsValue> {
    let mut decoded = image.to_decoded().map_err(|e| JsValue::from_str(&e))?;
    pix_core::apply_fine_tune(&mut decoded.pixels, &fine_tune.inner);
    Ok(JsDecodedImage::from_decoded(decoded))
}
