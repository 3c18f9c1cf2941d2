//! pix Core - batch image editing library
//!
//! This crate provides the core functionality of pix: loading images
//! (with HEIC/HEIF conversion), session state, the render pipeline that
//! resizes and fine-tunes an asset, encoders, and batch export to a single
//! file or a ZIP archive.

pub mod adjustments;
pub mod archive;
pub mod asset;
pub mod decode;
pub mod encode;
pub mod export;
pub mod render;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use adjustments::apply_fine_tune;
pub use archive::{archive_name, ArchiveBuilder, ArchiveError};
pub use asset::{Asset, AssetId, LoadError, LoadReport, SourceFile};
pub use decode::{DecodedImage, HeifConverter, NoHeifConverter};
pub use encode::OutputFormat;
pub use export::{
    base_name, entry_name, export_snapshot, Download, ExportError, ExportFailure, ExportOutcome,
    RasterEncoder, SurfaceEncoder,
};
pub use render::{
    check_dimensions, RenderError, RenderParams, Renderer, MAX_DIMENSION, MAX_PIXELS,
};
pub use session::{
    EditParams, ExportSnapshot, LoadOutcome, PreviewRequest, Session, SessionError,
};

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest accepted fine-tune percentage.
pub const MIN_PERCENT: u16 = 0;
/// Highest accepted fine-tune percentage.
pub const MAX_PERCENT: u16 = 200;
/// Neutral fine-tune percentage.
pub const NEUTRAL_PERCENT: u16 = 100;

/// Color fine-tuning applied uniformly to every asset.
///
/// Each value is a percentage in `[0, 200]`, 100 being neutral. Values are
/// clamped on construction, on every setter, and when deserialized, so an
/// out-of-range value can never reach the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTune {
    #[serde(deserialize_with = "deserialize_percent")]
    brightness: u16,
    #[serde(deserialize_with = "deserialize_percent")]
    contrast: u16,
    #[serde(deserialize_with = "deserialize_percent")]
    saturation: u16,
}

impl Default for FineTune {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
        }
    }
}

impl FineTune {
    /// Create fine-tune values, clamping each to `[0, 200]`.
    pub fn new(brightness: u16, contrast: u16, saturation: u16) -> Self {
        Self {
            brightness: clamp_percent(brightness as i64),
            contrast: clamp_percent(contrast as i64),
            saturation: clamp_percent(saturation as i64),
        }
    }

    pub fn brightness(&self) -> u16 {
        self.brightness
    }

    pub fn contrast(&self) -> u16 {
        self.contrast
    }

    pub fn saturation(&self) -> u16 {
        self.saturation
    }

    /// Set brightness; returns the value actually stored.
    pub fn set_brightness(&mut self, value: i64) -> u16 {
        self.brightness = clamp_percent(value);
        self.brightness
    }

    /// Set contrast; returns the value actually stored.
    pub fn set_contrast(&mut self, value: i64) -> u16 {
        self.contrast = clamp_percent(value);
        self.contrast
    }

    /// Set saturation; returns the value actually stored.
    pub fn set_saturation(&mut self, value: i64) -> u16 {
        self.saturation = clamp_percent(value);
        self.saturation
    }

    /// Check if all values are neutral
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The equivalent CSS/canvas filter string, in application order.
    pub fn filter_string(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%)",
            self.brightness, self.contrast, self.saturation
        )
    }
}

fn clamp_percent(value: i64) -> u16 {
    value.clamp(MIN_PERCENT as i64, MAX_PERCENT as i64) as u16
}

fn deserialize_percent<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_nan() {
        return Ok(NEUTRAL_PERCENT);
    }
    Ok(clamp_percent(value.round() as i64))
}
