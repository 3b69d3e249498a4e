//! Configuration initialization and hierarchy management

use tracing::{debug, info};

use crate::cli::Cli;
use crate::domain::errors::DomainError;
use crate::domain::model::{ClipRequest, EncoderSettings};
use crate::ports::{ConfigPort, FileSettings};

/// Settings resolved for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub request: ClipRequest,
    pub encoder: EncoderSettings,
}

/// Resolve settings following precedence: CLI > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config_port: &dyn ConfigPort,
    cli: &Cli,
) -> Result<ResolvedSettings, DomainError> {
    let file_settings = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config_port.load_settings(path).await?
        }
        None => FileSettings::default(),
    };

    let resolved = resolve_settings(cli, &file_settings);
    debug!("Resolved settings: {:?}", resolved);
    Ok(resolved)
}

/// Merge CLI values over file values over built-in defaults
pub fn resolve_settings(cli: &Cli, file: &FileSettings) -> ResolvedSettings {
    let defaults = &file.defaults;

    let input = cli
        .input
        .clone()
        .or_else(|| defaults.input.clone().map(Into::into))
        .unwrap_or_else(|| ClipRequest::DEFAULT_INPUT.into());
    let output = cli
        .output
        .clone()
        .or_else(|| defaults.output.clone().map(Into::into))
        .unwrap_or_else(|| ClipRequest::DEFAULT_OUTPUT.into());

    let request = ClipRequest::new(input, output)
        .with_max_duration(
            cli.max_duration
                .or(defaults.max_duration)
                .unwrap_or(ClipRequest::DEFAULT_MAX_DURATION),
        )
        .with_crop_percent(
            cli.crop_percent
                .or(defaults.crop_percent)
                .unwrap_or(ClipRequest::DEFAULT_CROP_PERCENT),
        )
        .with_size(cli.size.or(defaults.size).unwrap_or(ClipRequest::DEFAULT_SIZE))
        .with_audio(cli.audio || defaults.audio.unwrap_or(false));

    let overrides = &file.encoder;
    let base = EncoderSettings::default();
    let encoder = EncoderSettings {
        codec: cli
            .codec
            .clone()
            .or_else(|| overrides.codec.clone())
            .unwrap_or(base.codec),
        preset: cli
            .preset
            .clone()
            .or_else(|| overrides.preset.clone())
            .unwrap_or(base.preset),
        crf: cli.crf.or(overrides.crf).unwrap_or(base.crf),
        threads: overrides.threads.unwrap_or(base.threads),
    };

    ResolvedSettings { request, encoder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{EncoderOverrides, RequestDefaults};
    use std::path::PathBuf;

    #[test]
    fn test_builtin_defaults() {
        let resolved = resolve_settings(&Cli::default(), &FileSettings::default());
        assert_eq!(resolved.request, ClipRequest::default());
        assert_eq!(resolved.encoder.codec, "libx264");
        assert_eq!(resolved.encoder.preset, "medium");
        assert_eq!(resolved.encoder.crf, 23);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = FileSettings {
            defaults: RequestDefaults {
                max_duration: Some(5.0),
                size: Some(128),
                audio: Some(true),
                ..RequestDefaults::default()
            },
            encoder: EncoderOverrides {
                preset: Some("slow".to_string()),
                threads: Some(2),
                ..EncoderOverrides::default()
            },
        };
        let resolved = resolve_settings(&Cli::default(), &file);

        assert_eq!(resolved.request.max_duration, 5.0);
        assert_eq!(resolved.request.size, 128);
        assert!(resolved.request.keep_audio);
        assert_eq!(resolved.request.crop_percent, 0.7);
        assert_eq!(resolved.encoder.preset, "slow");
        assert_eq!(resolved.encoder.threads, 2);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileSettings {
            defaults: RequestDefaults {
                input: Some("from_file.mp4".to_string()),
                crop_percent: Some(0.5),
                ..RequestDefaults::default()
            },
            encoder: EncoderOverrides {
                crf: Some(30),
                ..EncoderOverrides::default()
            },
        };
        let cli = Cli {
            input: Some(PathBuf::from("from_cli.mp4")),
            crop_percent: Some(0.9),
            crf: Some(18),
            ..Cli::default()
        };
        let resolved = resolve_settings(&cli, &file);

        assert_eq!(resolved.request.input_path, PathBuf::from("from_cli.mp4"));
        assert_eq!(resolved.request.crop_percent, 0.9);
        assert_eq!(resolved.encoder.crf, 18);
    }

    #[test]
    fn test_invalid_values_pass_through_to_validator() {
        let cli = Cli {
            size: Some(-3),
            max_duration: Some(-1.0),
            ..Cli::default()
        };
        let resolved = resolve_settings(&cli, &FileSettings::default());
        assert_eq!(resolved.request.size, -3);
        assert_eq!(resolved.request.max_duration, -1.0);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_error() {
        let adapter = crate::adapters::FileConfigAdapter::new().unwrap();
        let cli = Cli {
            config: Some(PathBuf::from("does/not/exist.toml")),
            ..Cli::default()
        };
        let result = initialize_configuration_hierarchy(&adapter, &cli).await;
        assert!(matches!(result, Err(DomainError::ConfigError(_))));
    }
}
