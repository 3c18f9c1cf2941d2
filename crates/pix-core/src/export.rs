//! Export orchestration: render every asset of a snapshot, encode it, and
//! package the result as one download.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::archive::{archive_name, ArchiveBuilder, ArchiveError, ARCHIVE_MIME};
use crate::asset::Asset;
use crate::decode::DecodedImage;
use crate::encode::{encode_image, EncodeError, OutputFormat};
use crate::render::{RenderError, RenderParams, Renderer};
use crate::session::{ExportSnapshot, SessionError};

/// Errors that stop an export, or that one asset failed with.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NoAssets,

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("archive failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A finished file, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// One asset that could not be exported as part of a batch.
#[derive(Debug)]
pub struct ExportFailure {
    /// Original asset file name.
    pub name: String,
    pub error: ExportError,
}

/// Result of an export run.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// `None` only when every asset of a batch failed.
    pub download: Option<Download>,
    pub failures: Vec<ExportFailure>,
}

/// Serializes a rendered surface. The seam between rendering and codecs.
pub trait SurfaceEncoder {
    fn encode(&self, surface: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError>;
}

/// The production encoder, backed by [`encode_image`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterEncoder;

impl SurfaceEncoder for RasterEncoder {
    fn encode(&self, surface: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
        encode_image(surface, format)
    }
}

/// File name up to its first `.`; the full name if that leaves nothing.
pub fn base_name(name: &str) -> &str {
    match name.split('.').next() {
        Some(base) if !base.is_empty() => base,
        _ => name,
    }
}

/// Output file name for an asset: `<base-name>.<ext>`.
pub fn entry_name(name: &str, format: OutputFormat) -> String {
    format!("{}.{}", base_name(name), format.extension())
}

/// Export a snapshot.
///
/// A single asset becomes a direct download and any failure is returned as
/// the error. Several assets become a ZIP named after `timestamp_ms`; assets
/// that fail are reported in [`ExportOutcome::failures`] and skipped.
pub fn export_snapshot(
    snapshot: &ExportSnapshot,
    renderer: &mut Renderer,
    encoder: &dyn SurfaceEncoder,
    timestamp_ms: i64,
) -> Result<ExportOutcome, ExportError> {
    let format = snapshot.params.format;
    match snapshot.assets.as_slice() {
        [] => Err(ExportError::NoAssets),
        [asset] => {
            let bytes = export_one(asset, snapshot, renderer, encoder)?;
            let file_name = entry_name(asset.name(), format);
            info!(file = %file_name, size = bytes.len(), "exported single file");
            Ok(ExportOutcome {
                download: Some(Download {
                    file_name,
                    mime: format.mime().to_string(),
                    bytes,
                }),
                failures: Vec::new(),
            })
        }
        assets => {
            let mut archive = ArchiveBuilder::new();
            let mut failures = Vec::new();

            for asset in assets {
                match export_one(asset, snapshot, renderer, encoder) {
                    Ok(bytes) => {
                        let wanted = entry_name(asset.name(), format);
                        let stored = archive.add(&wanted, &bytes)?;
                        if stored != wanted {
                            debug!(
                                name = %asset.name(),
                                entry = %stored,
                                "renamed duplicate entry"
                            );
                        }
                    }
                    Err(error) => {
                        warn!(name = %asset.name(), %error, "skipping asset in batch export");
                        failures.push(ExportFailure {
                            name: asset.name().to_string(),
                            error,
                        });
                    }
                }
            }

            info!(
                entries = archive.len(),
                failed = failures.len(),
                "exported batch"
            );
            let download = if archive.is_empty() {
                None
            } else {
                Some(Download {
                    file_name: archive_name(timestamp_ms),
                    mime: ARCHIVE_MIME.to_string(),
                    bytes: archive.finish()?,
                })
            };
            Ok(ExportOutcome { download, failures })
        }
    }
}

fn export_one(
    asset: &Asset,
    snapshot: &ExportSnapshot,
    renderer: &mut Renderer,
    encoder: &dyn SurfaceEncoder,
) -> Result<Vec<u8>, ExportError> {
    let params = RenderParams::resolve(&snapshot.params, asset);
    let surface = renderer.draw(asset, &params)?;
    Ok(encoder.encode(surface, snapshot.params.format)?)
}
