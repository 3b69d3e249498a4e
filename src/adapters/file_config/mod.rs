// File config adapter - Settings from TOML or YAML files

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::*;
use crate::ports::*;

/// Supported configuration file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the syntax from the file extension
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            _ => Err(DomainError::ConfigError(format!(
                "Unsupported config file extension: {} (expected .toml, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Configuration adapter reading TOML or YAML files
#[derive(Debug, Default)]
pub struct FileConfigAdapter;

impl FileConfigAdapter {
    /// Create new file config adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }

    /// Parse settings from file contents
    pub fn parse_settings(content: &str, format: ConfigFormat) -> Result<FileSettings, DomainError> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e))),
            ConfigFormat::Yaml => {
                // An empty YAML document deserializes as null
                if content.trim().is_empty() {
                    return Ok(FileSettings::default());
                }
                serde_yaml::from_str(content)
                    .map_err(|e| DomainError::ConfigError(format!("Failed to parse YAML config: {}", e)))
            }
        }
    }
}

#[async_trait]
impl ConfigPort for FileConfigAdapter {
    async fn load_settings(&self, file_path: &Path) -> Result<FileSettings, DomainError> {
        let format = ConfigFormat::from_path(file_path)?;

        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            DomainError::ConfigError(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let settings = Self::parse_settings(&content, format)?;
        info!("Loaded configuration from {}", file_path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")).unwrap(), ConfigFormat::Yaml);
        assert!(ConfigFormat::from_path(Path::new("a.json")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
            [defaults]
            max_duration = 5.0
            audio = true

            [encoder]
            preset = "slow"
            crf = 20
        "#;
        let settings = FileConfigAdapter::parse_settings(content, ConfigFormat::Toml).unwrap();
        assert_eq!(settings.defaults.max_duration, Some(5.0));
        assert_eq!(settings.defaults.audio, Some(true));
        assert_eq!(settings.defaults.size, None);
        assert_eq!(settings.encoder.preset.as_deref(), Some("slow"));
        assert_eq!(settings.encoder.crf, Some(20));
    }

    #[test]
    fn test_parse_yaml() {
        let content = "defaults:\n  crop_percent: 0.5\n  size: 480\nencoder:\n  codec: libx264\n";
        let settings = FileConfigAdapter::parse_settings(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(settings.defaults.crop_percent, Some(0.5));
        assert_eq!(settings.defaults.size, Some(480));
        assert_eq!(settings.encoder.codec.as_deref(), Some("libx264"));

        let empty = FileConfigAdapter::parse_settings("", ConfigFormat::Yaml).unwrap();
        assert_eq!(empty, FileSettings::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = FileConfigAdapter::parse_settings("[defaults]\nspeed = 2\n", ConfigFormat::Toml);
        assert!(matches!(result, Err(DomainError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_load_settings_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("squarecut.toml");
        std::fs::write(&path, "[encoder]\nthreads = 2\n").unwrap();

        let adapter = FileConfigAdapter::new().unwrap();
        let settings = adapter.load_settings(&path).await.unwrap();
        assert_eq!(settings.encoder.threads, Some(2));

        let missing = adapter.load_settings(&temp_dir.path().join("missing.toml")).await;
        assert!(matches!(missing, Err(DomainError::ConfigError(_))));
    }
}
