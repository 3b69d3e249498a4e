//! CLI module for squarecut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_num::number_range;

pub mod commands;

use crate::domain::model::{EncoderSettings, TimeSpec};

/// squarecut
///
/// Trims a video, crops a centered square out of it and optionally resizes
/// the square, re-encoding the result with H.264.
#[derive(Parser, Debug, Clone)]
#[command(name = "squarecut")]
#[command(about = "Square-crop, trim and resize a video clip")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Input video file path
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output video file path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Maximum output duration (seconds, MM:SS.ms or HH:MM:SS.ms) [default: 3.0]
    #[arg(long, allow_negative_numbers = true, value_parser = parse_duration_arg)]
    pub max_duration: Option<f64>,

    /// Fraction of the shorter side kept by the square crop, in (0, 1] [default: 0.7]
    #[arg(long, allow_negative_numbers = true)]
    pub crop_percent: Option<f64>,

    /// Final square edge in pixels, 0 keeps the crop size [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub size: Option<i64>,

    /// Keep the source audio track
    #[arg(long)]
    pub audio: bool,

    /// Video encoder name [default: libx264]
    #[arg(long)]
    pub codec: Option<String>,

    /// Encoding preset [default: medium]
    #[arg(long)]
    pub preset: Option<String>,

    /// Constant Rate Factor (0-51) [default: 23]
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Configuration file (.toml, .yaml or .yml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Print the output report as JSON after the success line
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text
    Pretty,
    /// One JSON object per event
    Json,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            max_duration: None,
            crop_percent: None,
            size: None,
            audio: false,
            codec: None,
            preset: None,
            crf: None,
            config: None,
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            json: false,
        }
    }
}

/// Parse `--max-duration`: plain seconds (negatives pass through) or clock notation
pub fn parse_duration_arg(value: &str) -> Result<f64, String> {
    if let Ok(seconds) = value.trim().parse::<f64>() {
        return Ok(seconds);
    }
    TimeSpec::parse(value)
        .map(|time| time.as_seconds())
        .map_err(|e| e.to_string())
}

fn parse_crf(value: &str) -> Result<u8, String> {
    number_range(value, 0, EncoderSettings::MAX_CRF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let cli = Cli::try_parse_from(["squarecut"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.max_duration.is_none());
        assert!(!cli.audio);
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "squarecut",
            "--input",
            "a.mp4",
            "--output",
            "b.mp4",
            "--max-duration",
            "00:05.5",
            "--crop-percent",
            "0.5",
            "--size",
            "256",
            "--audio",
            "--crf",
            "18",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("a.mp4")));
        assert_eq!(cli.output, Some(PathBuf::from("b.mp4")));
        assert_eq!(cli.max_duration, Some(5.5));
        assert_eq!(cli.crop_percent, Some(0.5));
        assert_eq!(cli.size, Some(256));
        assert!(cli.audio);
        assert_eq!(cli.crf, Some(18));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_negative_values_reach_validator() {
        let cli = Cli::try_parse_from(["squarecut", "--size", "-5", "--max-duration", "-1"]).unwrap();
        assert_eq!(cli.size, Some(-5));
        assert_eq!(cli.max_duration, Some(-1.0));
    }

    #[test]
    fn test_crf_range_checked_at_parse_time() {
        assert!(Cli::try_parse_from(["squarecut", "--crf", "52"]).is_err());
        assert!(Cli::try_parse_from(["squarecut", "--crf", "0"]).is_ok());
    }

    #[test]
    fn test_parse_duration_arg() {
        assert_eq!(parse_duration_arg("3"), Ok(3.0));
        assert_eq!(parse_duration_arg("-2.5"), Ok(-2.5));
        assert_eq!(parse_duration_arg("01:30"), Ok(90.0));
        assert!(parse_duration_arg("abc").is_err());
    }
}
