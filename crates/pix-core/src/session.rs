//! Session state: loaded assets, selection, and edit parameters.
//!
//! A [`Session`] is an explicit context object. It starts empty with default
//! parameters and is only reset by an explicit [`Session::reset`].
//!
//! Two pieces of scheduling live here as well:
//! - every mutation marks the preview dirty, and [`Session::take_frame`]
//!   hands out at most one [`PreviewRequest`] per display frame;
//! - an export works on an [`ExportSnapshot`] taken when it begins, and the
//!   session refuses mutations until [`Session::end_export`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::asset::{load_files, Asset, AssetId, LoadError, SourceFile};
use crate::decode::HeifConverter;
use crate::encode::OutputFormat;
use crate::export::{export_snapshot, ExportError, ExportOutcome, SurfaceEncoder};
use crate::render::{RenderParams, Renderer};
use crate::FineTune;

/// Errors returned by session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session is locked while an export runs.
    #[error("an export is in progress")]
    ExportInProgress,

    /// No asset at the given index.
    #[error("asset index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The operation needs at least one asset.
    #[error("no assets loaded")]
    Empty,
}

/// Session-wide edit parameters, applied uniformly to every asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditParams {
    /// When false, every asset renders at its native size.
    pub resize_enabled: bool,
    pub target_width: u32,
    pub target_height: u32,
    /// Keep width/height edits tied to the selected asset's aspect ratio.
    pub lock_aspect: bool,
    pub fine_tune: FineTune,
    pub format: OutputFormat,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            resize_enabled: true,
            target_width: 0,
            target_height: 0,
            lock_aspect: false,
            fine_tune: FineTune::default(),
            format: OutputFormat::default(),
        }
    }
}

/// What to draw for the next preview frame.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub asset: Arc<Asset>,
    pub params: RenderParams,
}

/// Assets and parameters frozen at the start of an export.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub assets: Vec<Arc<Asset>>,
    pub params: EditParams,
}

/// Outcome of loading a batch into the session.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Number of assets appended.
    pub loaded: usize,
    /// Per-file failures; the session keeps a single message for them.
    pub failures: Vec<LoadError>,
}

/// The editing session.
#[derive(Debug)]
pub struct Session {
    assets: Vec<Arc<Asset>>,
    selected: Option<usize>,
    params: EditParams,
    last_error: Option<String>,
    next_id: u64,
    preview_pending: bool,
    exporting: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An empty session with default parameters.
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            selected: None,
            params: EditParams::default(),
            last_error: None,
            next_id: 0,
            preview_pending: false,
            exporting: false,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.assets
    }

    pub fn asset(&self, index: usize) -> Option<&Arc<Asset>> {
        self.assets.get(index)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_asset(&self) -> Option<&Arc<Asset>> {
        self.selected.and_then(|i| self.assets.get(i))
    }

    pub fn params(&self) -> &EditParams {
        &self.params
    }

    /// Latest user-visible load error, cleared at the start of each load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Dimensions to show in the width/height fields: the targets, or the
    /// selected asset's native size while resizing is off.
    pub fn display_dimensions(&self) -> (u32, u32) {
        match (self.params.resize_enabled, self.selected_asset()) {
            (false, Some(asset)) => (asset.width(), asset.height()),
            _ => (self.params.target_width, self.params.target_height),
        }
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Load a batch of files and append the successes in input order.
    ///
    /// Failures never abort the batch; they are summarized in
    /// [`Session::last_error`]. The first successful load into an empty
    /// session selects it and initializes the target dimensions from it.
    pub fn load_files(
        &mut self,
        files: &[SourceFile],
        converter: &dyn HeifConverter,
    ) -> Result<LoadOutcome, SessionError> {
        self.ensure_idle()?;
        self.last_error = None;

        let was_empty = self.assets.is_empty();
        let next_id = &mut self.next_id;
        let report = load_files(files, converter, || {
            *next_id += 1;
            AssetId::new(*next_id)
        });

        self.last_error = report.error_message();
        let loaded = report.assets.len();

        if was_empty {
            if let Some(first) = report.assets.first() {
                self.params.target_width = first.width();
                self.params.target_height = first.height();
                self.selected = Some(0);
            }
        }
        self.assets.extend(report.assets.into_iter().map(Arc::new));

        info!(
            loaded,
            failed = report.failures.len(),
            total = self.assets.len(),
            "loaded files"
        );
        self.mark_dirty();
        Ok(LoadOutcome {
            loaded,
            failures: report.failures,
        })
    }

    /// Select the asset at `index`.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_idle()?;
        if index >= self.assets.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.assets.len(),
            });
        }
        self.selected = Some(index);
        self.mark_dirty();
        Ok(())
    }

    /// Remove the selected asset. The selection keeps its index, clamped to
    /// the new last asset, and becomes `None` once the session is empty.
    pub fn remove_selected(&mut self) -> Result<Arc<Asset>, SessionError> {
        self.ensure_idle()?;
        let index = self.selected.ok_or(SessionError::Empty)?;
        let removed = self.assets.remove(index);

        self.selected = match self.assets.len() {
            0 => None,
            len if index >= len => Some(len - 1),
            _ => Some(index),
        };
        debug!(asset = %removed.id(), remaining = self.assets.len(), "removed asset");
        self.mark_dirty();
        Ok(removed)
    }

    /// Drop every asset and restore default parameters.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        *self = Self {
            next_id: self.next_id,
            ..Self::new()
        };
        Ok(())
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    pub fn set_resize_enabled(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.update(|p| p.resize_enabled = enabled)
    }

    /// Toggle the aspect lock. Does not recompute anything by itself.
    pub fn set_lock_aspect(&mut self, locked: bool) -> Result<(), SessionError> {
        self.update(|p| p.lock_aspect = locked)
    }

    /// Set the target width; with the lock on, height follows as
    /// `round(width / ratio)`.
    pub fn set_target_width(&mut self, width: u32) -> Result<(), SessionError> {
        let ratio = self.locked_ratio();
        self.update(|p| {
            p.target_width = width;
            if let Some(ratio) = ratio {
                p.target_height = round_dimension(width as f64 / ratio);
            }
        })
    }

    /// Set the target height; with the lock on, width follows as
    /// `round(height * ratio)`.
    pub fn set_target_height(&mut self, height: u32) -> Result<(), SessionError> {
        let ratio = self.locked_ratio();
        self.update(|p| {
            p.target_height = height;
            if let Some(ratio) = ratio {
                p.target_width = round_dimension(height as f64 * ratio);
            }
        })
    }

    /// Set brightness, clamped to `[0, 200]`. Returns the stored value.
    pub fn set_brightness(&mut self, value: i64) -> Result<u16, SessionError> {
        self.ensure_idle()?;
        self.mark_dirty();
        Ok(self.params.fine_tune.set_brightness(value))
    }

    /// Set contrast, clamped to `[0, 200]`. Returns the stored value.
    pub fn set_contrast(&mut self, value: i64) -> Result<u16, SessionError> {
        self.ensure_idle()?;
        self.mark_dirty();
        Ok(self.params.fine_tune.set_contrast(value))
    }

    /// Set saturation, clamped to `[0, 200]`. Returns the stored value.
    pub fn set_saturation(&mut self, value: i64) -> Result<u16, SessionError> {
        self.ensure_idle()?;
        self.mark_dirty();
        Ok(self.params.fine_tune.set_saturation(value))
    }

    /// Put brightness, contrast, and saturation back to 100%.
    pub fn reset_fine_tune(&mut self) -> Result<(), SessionError> {
        self.update(|p| p.fine_tune = FineTune::default())
    }

    pub fn set_format(&mut self, format: OutputFormat) -> Result<(), SessionError> {
        self.update(|p| p.format = format)
    }

    /// Replace every parameter at once, e.g. from a saved preset.
    pub fn set_params(&mut self, params: EditParams) -> Result<(), SessionError> {
        self.update(|p| *p = params)
    }

    // ------------------------------------------------------------------
    // Preview scheduling
    // ------------------------------------------------------------------

    /// Ask for a redraw without changing anything (e.g. after a resize of
    /// the preview area).
    pub fn request_preview(&mut self) {
        self.mark_dirty();
    }

    /// Called once per display frame. Returns the pending preview, if any,
    /// and clears it; any number of mutations since the last frame collapse
    /// into this single request.
    pub fn take_frame(&mut self) -> Option<PreviewRequest> {
        if !std::mem::take(&mut self.preview_pending) {
            return None;
        }
        let asset = Arc::clone(self.selected_asset()?);
        let params = RenderParams::resolve(&self.params, &asset);
        Some(PreviewRequest { asset, params })
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Freeze the current assets and parameters and lock the session.
    pub fn begin_export(&mut self) -> Result<ExportSnapshot, SessionError> {
        self.ensure_idle()?;
        if self.assets.is_empty() {
            return Err(SessionError::Empty);
        }
        self.exporting = true;
        Ok(ExportSnapshot {
            assets: self.assets.clone(),
            params: self.params.clone(),
        })
    }

    /// Unlock the session after an export finished or failed.
    pub fn end_export(&mut self) {
        self.exporting = false;
    }

    /// Run a whole export: snapshot, render and encode every asset, unlock.
    pub fn export(
        &mut self,
        renderer: &mut Renderer,
        encoder: &dyn SurfaceEncoder,
        timestamp_ms: i64,
    ) -> Result<ExportOutcome, ExportError> {
        let snapshot = self.begin_export().map_err(|err| match err {
            SessionError::Empty => ExportError::NoAssets,
            other => ExportError::Session(other),
        })?;
        let result = export_snapshot(&snapshot, renderer, encoder, timestamp_ms);
        self.end_export();
        result
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.exporting {
            return Err(SessionError::ExportInProgress);
        }
        Ok(())
    }

    fn update(&mut self, apply: impl FnOnce(&mut EditParams)) -> Result<(), SessionError> {
        self.ensure_idle()?;
        apply(&mut self.params);
        self.mark_dirty();
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.preview_pending = true;
    }

    /// Ratio of the selected asset when the aspect lock is on.
    fn locked_ratio(&self) -> Option<f64> {
        if !self.params.lock_aspect {
            return None;
        }
        self.selected_asset()
            .map(|asset| asset.ratio())
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
    }
}

fn round_dimension(value: f64) -> u32 {
    // `as` saturates at the u32 bounds.
    value.round() as u32
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::asset::Asset;
    use crate::test_helpers::gradient_image;
    use proptest::prelude::*;

    fn session_with_asset(width: u32, height: u32) -> Session {
        let mut session = Session::new();
        session.assets.push(Arc::new(Asset::new(
            AssetId::new(1),
            "a.png",
            gradient_image(width, height),
        )));
        session.selected = Some(0);
        session
    }

    proptest! {
        /// Property: With the lock on, editing width sets height to round(width / ratio).
        #[test]
        fn prop_lock_width_recomputes_height(
            native_w in 1u32..=64,
            native_h in 1u32..=64,
            width in 0u32..=10_000,
        ) {
            let mut session = session_with_asset(native_w, native_h);
            session.set_lock_aspect(true).unwrap();
            session.set_target_width(width).unwrap();

            let ratio = native_w as f64 / native_h as f64;
            prop_assert_eq!(session.params().target_height, (width as f64 / ratio).round() as u32);
        }

        /// Property: With the lock on, editing height sets width to round(height * ratio).
        #[test]
        fn prop_lock_height_recomputes_width(
            native_w in 1u32..=64,
            native_h in 1u32..=64,
            height in 0u32..=10_000,
        ) {
            let mut session = session_with_asset(native_w, native_h);
            session.set_lock_aspect(true).unwrap();
            session.set_target_height(height).unwrap();

            let ratio = native_w as f64 / native_h as f64;
            prop_assert_eq!(session.params().target_width, (height as f64 * ratio).round() as u32);
        }
    }
}
