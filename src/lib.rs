//! squarecut library
//!
//! Crops a video to a centered square, trims it to a maximum duration and
//! optionally resizes it, re-encoding with H.264 through libav.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{ClipRequest, CropRect, EncoderSettings, OutputReport, SourceInfo, TransformPlan};

/// Initialize the libav backend
pub fn init() -> Result<(), DomainError> {
    ffmpeg_next::init()
        .map_err(|e| DomainError::ProcessingError(format!("FFmpeg initialization failed: {}", e)))
}
