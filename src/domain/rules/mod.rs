// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// Up-front checks on user parameters; nothing here touches media
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validate a request given whether its input path exists.
    ///
    /// A missing input wins over any range error so the reported
    /// condition does not depend on flag order.
    pub fn validate(request: &ClipRequest, input_exists: bool) -> Result<(), DomainError> {
        if !input_exists {
            return Err(DomainError::FileNotFound(format!(
                "Input file does not exist: {}",
                request.input_path.display()
            )));
        }
        Self::validate_ranges(request)
    }

    /// Range checks for crop percent, max duration and size
    pub fn validate_ranges(request: &ClipRequest) -> Result<(), DomainError> {
        // Negated comparisons also reject NaN
        if !(request.crop_percent > 0.0 && request.crop_percent <= 1.0) {
            return Err(DomainError::BadArgs(format!(
                "--crop-percent must be within (0, 1], got {}",
                request.crop_percent
            )));
        }
        if !(request.max_duration > 0.0) {
            return Err(DomainError::BadArgs(format!(
                "--max-duration must be greater than 0, got {}",
                request.max_duration
            )));
        }
        if request.size < 0 {
            return Err(DomainError::BadArgs(format!(
                "--size cannot be negative, got {}",
                request.size
            )));
        }
        if u32::try_from(request.size).is_err() {
            return Err(DomainError::BadArgs(format!(
                "--size is too large: {}",
                request.size
            )));
        }
        Ok(())
    }

    /// Validate encoder settings coming from flags or a config file
    pub fn validate_encoder(settings: &EncoderSettings) -> Result<(), DomainError> {
        if settings.crf > EncoderSettings::MAX_CRF {
            return Err(DomainError::BadArgs(format!(
                "CRF value {} is invalid (must be 0-{})",
                settings.crf,
                EncoderSettings::MAX_CRF
            )));
        }
        if settings.codec.trim().is_empty() {
            return Err(DomainError::BadArgs("Encoder name cannot be empty".to_string()));
        }
        if settings.preset.trim().is_empty() {
            return Err(DomainError::BadArgs("Encoder preset cannot be empty".to_string()));
        }
        if settings.threads == 0 {
            return Err(DomainError::BadArgs("Encoder thread count must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Centered square crop computation
pub struct CropPolicy;

impl CropPolicy {
    /// Side is `floor(min(width, height) * crop_percent)`, centered with integer division
    pub fn centered_square(
        width: u32,
        height: u32,
        crop_percent: f64,
    ) -> Result<CropRect, DomainError> {
        let side = (width.min(height) as f64 * crop_percent).floor() as u32;
        if side == 0 {
            return Err(DomainError::BadArgs(format!(
                "--crop-percent {} leaves no pixels of a {}x{} frame",
                crop_percent, width, height
            )));
        }

        Ok(CropRect {
            left: (width - side) / 2,
            top: (height - side) / 2,
            side,
        })
    }
}

/// Trim length selection
pub struct TrimPolicy;

impl TrimPolicy {
    /// `min(max_duration, source_duration)`; an unknown source duration does not cap
    pub fn effective_duration(max_duration: f64, source_duration: Option<&TimeSpec>) -> f64 {
        match source_duration {
            Some(duration) if duration.seconds > 0.0 => max_duration.min(duration.seconds),
            _ => max_duration,
        }
    }
}

/// Output frame geometry and pixel layout
pub struct OutputFormatPolicy;

impl OutputFormatPolicy {
    /// `size`x`size` when resizing, otherwise the crop side
    pub fn output_dimensions(crop: &CropRect, size: u32) -> (u32, u32) {
        if size > 0 {
            (size, size)
        } else {
            (crop.side, crop.side)
        }
    }

    /// 4:2:0 needs even dimensions; anything else is encoded 4:4:4
    pub fn chroma_for(width: u32, height: u32) -> ChromaLayout {
        if width % 2 == 0 && height % 2 == 0 {
            ChromaLayout::Yuv420
        } else {
            ChromaLayout::Yuv444
        }
    }
}

/// Assembles the transform plan for a validated request
pub struct PlanBuilder;

impl PlanBuilder {
    pub fn build(
        request: &ClipRequest,
        source: &SourceInfo,
        encoder: &EncoderSettings,
    ) -> Result<TransformPlan, DomainError> {
        ParameterValidator::validate_ranges(request)?;
        ParameterValidator::validate_encoder(encoder)?;

        let size = u32::try_from(request.size)
            .map_err(|_| DomainError::BadArgs(format!("Invalid size: {}", request.size)))?;

        let crop = CropPolicy::centered_square(source.width, source.height, request.crop_percent)?;
        let trim_duration =
            TrimPolicy::effective_duration(request.max_duration, source.duration.as_ref());
        let (output_width, output_height) = OutputFormatPolicy::output_dimensions(&crop, size);
        let chroma = OutputFormatPolicy::chroma_for(output_width, output_height);

        Ok(TransformPlan {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            crop,
            trim_duration,
            output_width,
            output_height,
            chroma,
            rotation: source.rotation,
            frame_rate: source.frame_rate,
            include_audio: request.keep_audio && source.has_audio,
            encoder: encoder.clone(),
        })
    }
}
