//! pix CLI: batch resize, fine-tune, and export images.
//!
//! Usage:
//!   pix export <FILES>... [OPTIONS]   Export files as one image or a ZIP
//!   pix info <FILES>...               Show dimensions of each file

use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::export::ExportArgs;

#[derive(Parser)]
#[command(
    name = "pix",
    about = "Batch image editor: resize, fine-tune, convert",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one or more images with the same edits applied
    Export(ExportArgs),

    /// Show name, dimensions, and aspect ratio of each image
    Info {
        /// Image files
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(if cli.verbose { "debug" } else { "info" });

    match cli.command {
        Commands::Export(args) => {
            let timestamp_ms = chrono::Utc::now().timestamp_millis();
            let written = commands::export::run(args, timestamp_ms)?;
            println!("Wrote {}", written.display());
            Ok(())
        }
        Commands::Info { files } => commands::info::run(&files),
    }
}
