//! Export images with the same edits applied to each.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use pix_core::{EditParams, NoHeifConverter, OutputFormat, RasterEncoder, Renderer, Session};
use tracing::{info, warn};

use super::read_source;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Image files to export. HEIC/HEIF inputs are not supported here and
    /// are reported as load failures; convert them first.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Output format: jpg, png, webp, avif, svg (or a MIME type)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Target width; with --lock-aspect the height follows
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height; with --lock-aspect the width follows
    #[arg(long)]
    pub height: Option<u32>,

    /// Keep the first image's aspect ratio when setting width or height
    #[arg(long)]
    pub lock_aspect: bool,

    /// Export every image at its native size
    #[arg(long)]
    pub no_resize: bool,

    /// Brightness percentage [0, 200]
    #[arg(long, allow_negative_numbers = true)]
    pub brightness: Option<i64>,

    /// Contrast percentage [0, 200]
    #[arg(long, allow_negative_numbers = true)]
    pub contrast: Option<i64>,

    /// Saturation percentage [0, 200]
    #[arg(long, allow_negative_numbers = true)]
    pub saturation: Option<i64>,

    /// JSON preset with saved edit parameters; flags override it
    #[arg(long)]
    pub preset: Option<PathBuf>,
}

/// Load the preset file. Missing keys take their defaults.
pub fn load_preset(path: &Path) -> anyhow::Result<EditParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid preset {}", path.display()))
}

/// Build the session the way the editor would and write the export into
/// the output directory. Returns the path written.
pub fn run(args: ExportArgs, timestamp_ms: i64) -> anyhow::Result<PathBuf> {
    let files = args
        .files
        .iter()
        .map(|path| read_source(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut session = Session::new();
    let outcome = session.load_files(&files, &NoHeifConverter)?;
    for failure in &outcome.failures {
        warn!("{failure}");
    }
    if session.is_empty() {
        bail!(
            "{}",
            session.last_error().unwrap_or("No images could be loaded")
        );
    }

    if let Some(path) = &args.preset {
        let mut preset = load_preset(path)?;
        // A preset without dimensions keeps the ones taken from the first image.
        if preset.target_width == 0 {
            preset.target_width = session.params().target_width;
        }
        if preset.target_height == 0 {
            preset.target_height = session.params().target_height;
        }
        session.set_params(preset)?;
    }
    apply_flags(&mut session, &args)?;

    let params = session.params();
    info!(
        files = session.len(),
        format = %params.format,
        width = params.target_width,
        height = params.target_height,
        resize = params.resize_enabled,
        filter = %params.fine_tune.filter_string(),
        "exporting"
    );

    let outcome = session.export(&mut Renderer::new(), &RasterEncoder, timestamp_ms)?;
    for failure in &outcome.failures {
        warn!(name = %failure.name, error = %failure.error, "not exported");
    }
    let Some(download) = outcome.download else {
        bail!("Every file failed to export");
    };

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let path = args.output.join(&download.file_name);
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Apply the command-line edits in the same order the editor's controls
/// would: toggles first, then width, then height, then fine-tune.
fn apply_flags(session: &mut Session, args: &ExportArgs) -> anyhow::Result<()> {
    if args.no_resize {
        session.set_resize_enabled(false)?;
    }
    if args.lock_aspect {
        session.set_lock_aspect(true)?;
    }
    if let Some(width) = args.width {
        session.set_target_width(width)?;
    }
    if let Some(height) = args.height {
        session.set_target_height(height)?;
    }
    if let Some(value) = args.brightness {
        session.set_brightness(value)?;
    }
    if let Some(value) = args.contrast {
        session.set_contrast(value)?;
    }
    if let Some(value) = args.saturation {
        session.set_saturation(value)?;
    }
    if let Some(format) = args.format {
        session.set_format(format)?;
    }
    Ok(())
}
