//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::Cli;
use crate::config_initialization::initialize_configuration_hierarchy;
use crate::utils::format_file_size;

/// Execute a crop run and print the result
pub async fn run(cli: Cli) -> Result<()> {
    let container = DefaultAppContainer::new()
        .context("Failed to initialize media backend")?;

    let settings = initialize_configuration_hierarchy(container.config_port().as_ref(), &cli)
        .await
        .context("Failed to load configuration")?;

    let input = settings.request.input_path.clone();
    let report = container
        .clip_interactor()
        .execute(settings.request, settings.encoder)
        .await
        .map_err(|e| {
            if e.is_validation_error() {
                anyhow::Error::new(e)
            } else {
                anyhow::Error::new(e).context(format!("Failed to crop {}", input.display()))
            }
        })?;

    info!(
        "Output is {}x{}, {:.3}s, {}",
        report.width,
        report.height,
        report.duration,
        format_file_size(report.file_size)
    );

    println!("Cropped video saved to: {}", report.output_path.display());
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    }

    Ok(())
}
