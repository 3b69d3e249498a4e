//! Per-frame square crop and resize

use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling::{Context as Scaler, Flags as ScaleFlags};
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{ChromaLayout, CropRect, Rotation};
use crate::engine::{pixel_format_for, rotate_planes};

/// Planar 8-bit format without chroma subsampling, so any offset can be cropped exactly
pub const WORKING_FORMAT: Pixel = Pixel::YUV444P;

/// Turns decoded source frames into encoder-ready square frames.
///
/// Frames are normalised to [`WORKING_FORMAT`] at the coded source size and
/// turned upright. The crop is then copied out of every plane, and a final
/// scaler resizes (when requested) and converts to the encoder pixel format.
/// The normalizer is rebuilt if the decoded format or size changes mid-stream.
pub struct SquareCropper {
    crop: CropRect,
    rotation: Rotation,
    source_width: u32,
    source_height: u32,
    output_width: u32,
    output_height: u32,
    output_format: Pixel,
    normalizer: Option<(Scaler, (Pixel, u32, u32))>,
    finisher: Option<Scaler>,
}

impl SquareCropper {
    /// `source_size` is the coded size; `crop` is placed on the frame as displayed after `rotation`
    pub fn new(
        crop: CropRect,
        source_size: (u32, u32),
        output_size: (u32, u32),
        chroma: ChromaLayout,
        rotation: Rotation,
    ) -> Result<Self, DomainError> {
        let (source_width, source_height) = source_size;
        let (display_width, display_height) = rotation.display_size(source_width, source_height);
        if !crop.fits_within(display_width, display_height) {
            return Err(DomainError::ProcessingError(format!(
                "Crop {} does not fit a {}x{} frame",
                crop, display_width, display_height
            )));
        }

        Ok(Self {
            crop,
            rotation,
            source_width,
            source_height,
            output_width: output_size.0,
            output_height: output_size.1,
            output_format: pixel_format_for(chroma),
            normalizer: None,
            finisher: None,
        })
    }

    /// Crop (and resize) one decoded frame
    pub fn process(&mut self, frame: &VideoFrame) -> Result<VideoFrame, DomainError> {
        let normalized;
        let planar = if frame.format() == WORKING_FORMAT
            && frame.width() == self.source_width
            && frame.height() == self.source_height
        {
            frame
        } else {
            normalized = self.normalize(frame)?;
            &normalized
        };

        let cropped = if self.rotation == Rotation::None {
            crop_planes(planar, &self.crop)
        } else {
            crop_planes(&rotate_planes(planar, self.rotation), &self.crop)
        };

        if self.finisher.is_none() {
            let scaler = Scaler::get(
                WORKING_FORMAT,
                self.crop.side,
                self.crop.side,
                self.output_format,
                self.output_width,
                self.output_height,
                ScaleFlags::BILINEAR,
            )
            .map_err(|e| DomainError::ProcessingError(format!("Failed to create output scaler: {}", e)))?;
            self.finisher = Some(scaler);
        }

        let mut output = VideoFrame::empty();
        if let Some(finisher) = self.finisher.as_mut() {
            finisher
                .run(&cropped, &mut output)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to scale cropped frame: {}", e)))?;
        }
        Ok(output)
    }

    fn normalize(&mut self, frame: &VideoFrame) -> Result<VideoFrame, DomainError> {
        let input_key = (frame.format(), frame.width(), frame.height());
        let stale = match &self.normalizer {
            Some((_, key)) => *key != input_key,
            None => true,
        };
        if stale {
            debug!(
                "Creating normalizer for {:?} {}x{}",
                input_key.0, input_key.1, input_key.2
            );
            let scaler = Scaler::get(
                input_key.0,
                input_key.1,
                input_key.2,
                WORKING_FORMAT,
                self.source_width,
                self.source_height,
                ScaleFlags::BILINEAR,
            )
            .map_err(|e| DomainError::ProcessingError(format!("Failed to create frame normalizer: {}", e)))?;
            self.normalizer = Some((scaler, input_key));
        }

        let mut planar = VideoFrame::empty();
        if let Some((scaler, _)) = self.normalizer.as_mut() {
            scaler
                .run(frame, &mut planar)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to normalize frame: {}", e)))?;
        }
        Ok(planar)
    }
}

/// Copy `crop` out of every plane of a [`WORKING_FORMAT`] frame
pub fn crop_planes(frame: &VideoFrame, crop: &CropRect) -> VideoFrame {
    let side = crop.side as usize;
    let left = crop.left as usize;
    let top = crop.top as usize;

    let mut cropped = VideoFrame::new(frame.format(), crop.side, crop.side);
    for plane in 0..frame.planes() {
        let src_stride = frame.stride(plane);
        let dst_stride = cropped.stride(plane);
        let src = frame.data(plane);
        let dst = cropped.data_mut(plane);

        for row in 0..side {
            let src_start = (top + row) * src_stride + left;
            let dst_start = row * dst_stride;
            dst[dst_start..dst_start + side].copy_from_slice(&src[src_start..src_start + side]);
        }
    }
    cropped
}
