// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for opening a source clip and reading its properties
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Open the source, read its properties and release it again
    async fn probe_source(&self, file_path: &Path) -> Result<SourceInfo, DomainError>;
}

/// Port for running the trim/crop/resize/encode pipeline
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Execute a transform plan, writing the output file
    async fn execute_plan(&self, plan: &TransformPlan) -> Result<OutputReport, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create every missing parent directory of `file_path`
    async fn create_parent_directories(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Get file size
    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError>;
}

/// Values a configuration file may supply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub defaults: RequestDefaults,
    pub encoder: EncoderOverrides,
}

/// Defaults for the user-facing parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestDefaults {
    pub input: Option<String>,
    pub output: Option<String>,
    pub max_duration: Option<f64>,
    pub crop_percent: Option<f64>,
    pub size: Option<i64>,
    pub audio: Option<bool>,
}

/// Overrides for encoder settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderOverrides {
    pub codec: Option<String>,
    pub preset: Option<String>,
    pub crf: Option<u8>,
    pub threads: Option<usize>,
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Load settings from a configuration file
    async fn load_settings(&self, file_path: &Path) -> Result<FileSettings, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
