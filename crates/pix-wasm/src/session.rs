//! Session bindings: the state behind the editor UI.
//!
//! The UI owns one [`JsSession`]. Every control writes through a setter,
//! the animation loop calls [`JsSession::frame`] once per frame, and the
//! export button calls [`JsSession::export`].
//!
//! ```typescript
//! const session = new JsSession();
//! const count = session.load_files(names, blobs, heicToPng);
//! function tick() {
//!   const frame = session.frame();
//!   if (frame) ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//!   requestAnimationFrame(tick);
//! }
//! ```

use js_sys::{Array, Function, Uint8Array};
use pix_core::decode::{ConversionError, HeifConverter};
use pix_core::{
    EditParams, NoHeifConverter, OutputFormat, RasterEncoder, Renderer, Session, SourceFile,
};
use wasm_bindgen::prelude::*;

use crate::log;
use crate::types::{failure_lines, JsDownload, JsRenderedImage};

/// HEIC/HEIF conversion through a JavaScript function.
///
/// The function receives the file bytes as a `Uint8Array` and must return a
/// `Uint8Array` or an array of them (only the first is used). It is called
/// synchronously.
struct JsHeifConverter {
    function: Function,
}

impl HeifConverter for JsHeifConverter {
    fn convert(&self, bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConversionError> {
        let input = Uint8Array::from(bytes);
        let output = self
            .function
            .call1(&JsValue::NULL, &input)
            .map_err(|err| ConversionError::Failed(describe(&err)))?;

        if Array::is_array(&output) {
            Array::from(&output)
                .iter()
                .map(|item| {
                    item.dyn_into::<Uint8Array>()
                        .map(|array| array.to_vec())
                        .map_err(|_| ConversionError::Failed("converter returned a non-byte item".into()))
                })
                .collect()
        } else if let Some(array) = output.dyn_ref::<Uint8Array>() {
            Ok(vec![array.to_vec()])
        } else {
            Err(ConversionError::Failed(
                "converter must return a Uint8Array or an array of them".into(),
            ))
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The editing session exposed to JavaScript.
#[wasm_bindgen]
pub struct JsSession {
    inner: Session,
    renderer: Renderer,
}

impl Default for JsSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsSession {
    /// An empty session with default parameters.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Session::new(),
            renderer: Renderer::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Load files given as parallel arrays of names and `Uint8Array`s.
    ///
    /// `converter` handles `.heic`/`.heif` inputs; without it those files
    /// fail to load. Returns how many files loaded. Failures are summarized
    /// in `last_error` and logged to the console.
    pub fn load_files(
        &mut self,
        names: Vec<String>,
        blobs: Array,
        converter: Option<Function>,
    ) -> Result<usize, JsValue> {
        if names.len() != blobs.length() as usize {
            return Err(JsValue::from_str(&format!(
                "{} names but {} blobs",
                names.len(),
                blobs.length()
            )));
        }

        let files = names
            .into_iter()
            .zip(blobs.iter())
            .map(|(name, blob)| {
                let bytes = blob
                    .dyn_into::<Uint8Array>()
                    .map_err(|_| JsValue::from_str(&format!("{name}: expected a Uint8Array")))?
                    .to_vec();
                Ok(SourceFile::new(name, bytes))
            })
            .collect::<Result<Vec<_>, JsValue>>()?;

        let loaded = match converter {
            Some(function) => self.load_sources(&files, &JsHeifConverter { function }),
            None => self.load_sources(&files, &NoHeifConverter),
        };
        loaded.map_err(js_err)
    }

    /// Message for the last load batch that had failures.
    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(str::to_string)
    }

    // ---------------------------------------------------------------------
    // Assets and selection
    // ---------------------------------------------------------------------

    #[wasm_bindgen(getter)]
    pub fn asset_count(&self) -> usize {
        self.inner.len()
    }

    pub fn asset_name(&self, index: usize) -> Option<String> {
        self.inner.asset(index).map(|a| a.name().to_string())
    }

    pub fn asset_width(&self, index: usize) -> Option<u32> {
        self.inner.asset(index).map(|a| a.width())
    }

    pub fn asset_height(&self, index: usize) -> Option<u32> {
        self.inner.asset(index).map(|a| a.height())
    }

    #[wasm_bindgen(getter)]
    pub fn selected_index(&self) -> Option<usize> {
        self.inner.selected_index()
    }

    pub fn select(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.select(index).map_err(js_err)
    }

    /// Remove the selected asset; returns its name.
    pub fn remove_selected(&mut self) -> Result<String, JsValue> {
        self.inner
            .remove_selected()
            .map(|asset| asset.name().to_string())
            .map_err(js_err)
    }

    /// Drop all assets and restore defaults.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(js_err)
    }

    // ---------------------------------------------------------------------
    // Dimensions
    // ---------------------------------------------------------------------

    pub fn set_resize_enabled(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.inner.set_resize_enabled(enabled).map_err(js_err)
    }

    pub fn set_lock_aspect(&mut self, locked: bool) -> Result<(), JsValue> {
        self.inner.set_lock_aspect(locked).map_err(js_err)
    }

    pub fn set_target_width(&mut self, width: u32) -> Result<(), JsValue> {
        self.inner.set_target_width(width).map_err(js_err)
    }

    pub fn set_target_height(&mut self, height: u32) -> Result<(), JsValue> {
        self.inner.set_target_height(height).map_err(js_err)
    }

    #[wasm_bindgen(getter)]
    pub fn target_width(&self) -> u32 {
        self.inner.params().target_width
    }

    #[wasm_bindgen(getter)]
    pub fn target_height(&self) -> u32 {
        self.inner.params().target_height
    }

    /// Width to show in the input field (native width while resize is off).
    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> u32 {
        self.inner.display_dimensions().0
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> u32 {
        self.inner.display_dimensions().1
    }

    // ---------------------------------------------------------------------
    // Fine-tune
    // ---------------------------------------------------------------------

    /// Returns the stored (clamped) value.
    pub fn set_brightness(&mut self, value: i32) -> Result<u16, JsValue> {
        self.inner.set_brightness(value as i64).map_err(js_err)
    }

    pub fn set_contrast(&mut self, value: i32) -> Result<u16, JsValue> {
        self.inner.set_contrast(value as i64).map_err(js_err)
    }

    pub fn set_saturation(&mut self, value: i32) -> Result<u16, JsValue> {
        self.inner.set_saturation(value as i64).map_err(js_err)
    }

    pub fn reset_fine_tune(&mut self) -> Result<(), JsValue> {
        self.inner.reset_fine_tune().map_err(js_err)
    }

    pub fn filter_string(&self) -> String {
        self.inner.params().fine_tune.filter_string()
    }

    // ---------------------------------------------------------------------
    // Format and parameters
    // ---------------------------------------------------------------------

    /// Accepts a MIME type or short name.
    pub fn set_format(&mut self, format: &str) -> Result<(), JsValue> {
        let format: OutputFormat = format.parse().map_err(js_err)?;
        self.inner.set_format(format).map_err(js_err)
    }

    /// Output MIME type.
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.params().format.mime().to_string()
    }

    /// Current parameters as a plain object (camelCase keys).
    pub fn params_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.params())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize params: {}", e)))
    }

    /// Replace all parameters from a plain object; missing keys take defaults.
    pub fn set_params_json(&mut self, value: JsValue) -> Result<(), JsValue> {
        let params: EditParams = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid params: {}", e)))?;
        self.inner.set_params(params).map_err(js_err)
    }

    // ---------------------------------------------------------------------
    // Preview and export
    // ---------------------------------------------------------------------

    /// Call once per animation frame. Returns the preview to draw, or
    /// nothing if no change happened since the last frame.
    pub fn frame(&mut self) -> Result<Option<JsRenderedImage>, JsValue> {
        self.render_frame().map_err(JsValue::from)
    }

    /// Export every asset. A single asset downloads directly; several become
    /// a ZIP named after `timestamp_ms`.
    pub fn export(&mut self, timestamp_ms: f64) -> Result<JsDownload, JsValue> {
        let outcome = self
            .inner
            .export(&mut self.renderer, &RasterEncoder, timestamp_ms as i64)
            .map_err(js_err)?;

        let lines = failure_lines(&outcome.failures);
        for line in &lines {
            log::warn(&format!("export skipped {line}"));
        }
        match outcome.download {
            Some(download) => Ok(JsDownload::new(download, &outcome.failures)),
            None => Err(JsValue::from_str(&format!(
                "Every file failed to export ({})",
                lines.join("; ")
            ))),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn is_exporting(&self) -> bool {
        self.inner.is_exporting()
    }
}

impl JsSession {
    pub(crate) fn load_sources(
        &mut self,
        files: &[SourceFile],
        converter: &dyn HeifConverter,
    ) -> Result<usize, pix_core::SessionError> {
        let outcome = self.inner.load_files(files, converter)?;
        for failure in &outcome.failures {
            log::warn(&format!("failed to load {failure}"));
        }
        Ok(outcome.loaded)
    }

    /// Draw the pending preview, if any. Errors come back as strings so the
    /// path stays usable off-wasm.
    pub(crate) fn render_frame(&mut self) -> Result<Option<JsRenderedImage>, String> {
        let Some(request) = self.inner.take_frame() else {
            return Ok(None);
        };
        let index = self.inner.selected_index().unwrap_or_default();
        let surface = self
            .renderer
            .draw(&request.asset, &request.params)
            .map_err(|e| e.to_string())?;
        Ok(Some(JsRenderedImage::new(
            index,
            surface,
            request.params.fine_tune.filter_string(),
        )))
    }
}
