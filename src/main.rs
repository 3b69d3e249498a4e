//! squarecut
//!
//! Crops a video to a centered square, trims it and optionally resizes it.
//!
//! # Usage
//!
//! ```bash
//! squarecut --input clip.mp4 --output square.mp4 --max-duration 3 --crop-percent 0.7
//! squarecut --input clip.mp4 --output thumb.mp4 --size 256 --audio
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use squarecut::cli::{commands, Cli};
use squarecut::ports::LogLevel;
use squarecut::utils::logging::init_logging;

/// Main entry point for the squarecut CLI
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LogLevel::parse(&cli.log_level)?, cli.log_format)?;
    debug!("Starting squarecut with {:?}", cli);

    commands::run(cli).await
}
