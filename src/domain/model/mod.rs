// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string: seconds (`3.5`), `MM:SS.ms` or `HH:MM:SS.ms`
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_clock_field(minutes, "minutes")?;
                let seconds = parse_seconds_field(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_clock_field(hours, "hours")?;
                let minutes = parse_clock_field(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                let seconds = parse_seconds_field(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 3.5), MM:SS.ms (e.g., 0:03.5), HH:MM:SS.ms (e.g., 0:00:03.5)".to_string(),
            )),
        }
    }

    /// Format as HH:MM:SS.ms, or MM:SS.ms below one hour
    pub fn format_hms(&self) -> String {
        let total_ms = (self.seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let milliseconds = total_ms % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_clock_field(field: &str, name: &str) -> Result<u32, DomainError> {
    field
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", name)))
}

fn parse_seconds_field(field: &str) -> Result<f64, DomainError> {
    let seconds = field
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// The six user-facing parameters of a crop run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Maximum output duration in seconds
    pub max_duration: f64,
    /// Fraction of the shorter source side kept by the square crop, in (0, 1]
    pub crop_percent: f64,
    /// Final square edge in pixels, 0 keeps the crop size
    pub size: i64,
    pub keep_audio: bool,
}

impl ClipRequest {
    pub const DEFAULT_INPUT: &'static str = "public/input.mp4";
    pub const DEFAULT_OUTPUT: &'static str = "public/output.mp4";
    pub const DEFAULT_MAX_DURATION: f64 = 3.0;
    pub const DEFAULT_CROP_PERCENT: f64 = 0.7;
    pub const DEFAULT_SIZE: i64 = 0;

    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            max_duration: Self::DEFAULT_MAX_DURATION,
            crop_percent: Self::DEFAULT_CROP_PERCENT,
            size: Self::DEFAULT_SIZE,
            keep_audio: false,
        }
    }

    pub fn with_max_duration(mut self, max_duration: f64) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_crop_percent(mut self, crop_percent: f64) -> Self {
        self.crop_percent = crop_percent;
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_audio(mut self, keep_audio: bool) -> Self {
        self.keep_audio = keep_audio;
        self
    }
}

impl Default for ClipRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INPUT, Self::DEFAULT_OUTPUT)
    }
}

/// What the pipeline needs to know about an opened source clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Displayed width, after applying `rotation`
    pub width: u32,
    /// Displayed height, after applying `rotation`
    pub height: u32,
    pub frame_rate: f64,
    /// `None` when neither the container nor the stream reports a duration
    pub duration: Option<TimeSpec>,
    pub has_audio: bool,
    pub video_codec: String,
    /// Rotation a player applies to decoded frames
    pub rotation: Rotation,
}

impl SourceInfo {
    /// Create new source info with validation
    pub fn new(
        width: u32,
        height: u32,
        frame_rate: f64,
        duration: Option<TimeSpec>,
        has_audio: bool,
        video_codec: String,
    ) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::ProbeFail("Video dimensions cannot be zero".to_string()));
        }
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(DomainError::ProbeFail("Frame rate must be positive".to_string()));
        }

        Ok(Self {
            width,
            height,
            frame_rate,
            duration,
            has_audio,
            video_codec,
            rotation: Rotation::None,
        })
    }

    /// Attach display rotation; `width` and `height` must already be the displayed size
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Clockwise rotation needed to show decoded frames upright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    CounterClockwise90,
}

impl Rotation {
    /// Snap an angle in degrees (clockwise) to the nearest quarter turn
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Rotation::None;
        }
        let quarter_turns = (degrees / 90.0).round() as i64;
        match quarter_turns.rem_euclid(4) {
            1 => Rotation::Clockwise90,
            2 => Rotation::Half,
            3 => Rotation::CounterClockwise90,
            _ => Rotation::None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::CounterClockwise90 => 270,
        }
    }

    /// Displayed size of a `width`x`height` coded frame
    pub fn display_size(&self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Rotation::Clockwise90 | Rotation::CounterClockwise90 => (height, width),
            Rotation::None | Rotation::Half => (width, height),
        }
    }
}

/// Centered square sub-region kept from every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub side: u32,
}

impl CropRect {
    pub fn right(&self) -> u32 {
        self.left + self.side
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.side
    }

    /// Whether the rectangle lies inside a `width`x`height` frame
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.side, self.side, self.left, self.top
        )
    }
}

/// Chroma subsampling of the encoded output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaLayout {
    /// 4:2:0, the widely compatible layout; needs even dimensions
    Yuv420,
    /// 4:4:4, used when an odd dimension rules out 4:2:0
    Yuv444,
}

impl ChromaLayout {
    pub fn pixel_format_name(&self) -> &'static str {
        match self {
            ChromaLayout::Yuv420 => "yuv420p",
            ChromaLayout::Yuv444 => "yuv444p",
        }
    }
}

impl fmt::Display for ChromaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pixel_format_name())
    }
}

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Encoder name, e.g. `libx264`
    pub codec: String,
    pub preset: String,
    /// Constant Rate Factor (0-51, lower is higher quality)
    pub crf: u8,
    pub threads: usize,
}

impl EncoderSettings {
    pub const DEFAULT_CODEC: &'static str = "libx264";
    pub const DEFAULT_PRESET: &'static str = "medium";
    pub const DEFAULT_CRF: u8 = 23;
    pub const MAX_CRF: u8 = 51;

    /// Encoder threads: 75% of logical CPUs, clamped to 1..=16
    pub fn optimal_threads() -> usize {
        let cpu_count = num_cpus::get();
        let optimal_threads = (cpu_count as f64 * 0.75).ceil() as usize;
        optimal_threads.clamp(1, 16)
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec: Self::DEFAULT_CODEC.to_string(),
            preset: Self::DEFAULT_PRESET.to_string(),
            crf: Self::DEFAULT_CRF,
            threads: Self::optimal_threads(),
        }
    }
}

/// Fully resolved description of one crop run, handed to the executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crop: CropRect,
    /// Seconds of source kept, starting at the first frame
    pub trim_duration: f64,
    pub output_width: u32,
    pub output_height: u32,
    pub chroma: ChromaLayout,
    /// Applied to decoded frames before cropping
    pub rotation: Rotation,
    pub frame_rate: f64,
    pub include_audio: bool,
    pub encoder: EncoderSettings,
}

impl TransformPlan {
    /// Whether frames are scaled after cropping
    pub fn resizes(&self) -> bool {
        self.output_width != self.crop.side || self.output_height != self.crop.side
    }
}

/// Summary of a finished crop run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputReport {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frames_written: u64,
    /// Encoded duration in seconds (frames / frame rate)
    pub duration: f64,
    pub audio_included: bool,
    pub file_size: u64,
    pub processing_time: Duration,
    pub completed_at: DateTime<Utc>,
}
