// Probe LibAV adapter - Source clip analysis using libav

use std::path::Path;

use async_trait::async_trait;
use ffmpeg_next::codec::decoder;
use ffmpeg_next::frame::side_data;
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use ffmpeg_next::{codec, format, media};
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{positive_rational, rotation_from_display_matrix, timestamp_seconds};
use crate::ports::*;

/// LibAV-based source probing adapter
#[derive(Debug)]
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg_next::init()
            .map_err(|e| DomainError::ProbeFail(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }

    /// Open the file, read its properties and close it again.
    ///
    /// Width and height are reported as displayed, after the stream's rotation.
    pub fn probe_blocking(file_path: &Path) -> Result<SourceInfo, DomainError> {
        let mut input = format::input(file_path).map_err(|e| {
            DomainError::ProbeFail(format!("Failed to open {}: {}", file_path.display(), e))
        })?;

        let video_stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| DomainError::ProbeFail("No video stream found in input file".to_string()))?;

        let stream_index = video_stream.index();
        let tagged_rotation = video_stream
            .metadata()
            .get("rotate")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .map(Rotation::from_degrees);

        let parameters = video_stream.parameters();
        let codec_name = parameters.id().name().to_string();
        let mut decoder = codec::context::Context::from_parameters(parameters)
            .map_err(|e| DomainError::ProbeFail(format!("Failed to read video parameters: {}", e)))?
            .decoder()
            .video()
            .map_err(|e| DomainError::ProbeFail(format!("Failed to create video decoder: {}", e)))?;

        let frame_rate = positive_rational(video_stream.avg_frame_rate())
            .or_else(|| positive_rational(video_stream.rate()))
            .ok_or_else(|| DomainError::ProbeFail("Could not determine source frame rate".to_string()))?;

        let duration = Self::container_duration(&input).or_else(|| {
            let stream_duration = video_stream.duration();
            (stream_duration > 0)
                .then(|| timestamp_seconds(stream_duration, video_stream.time_base()))
                .map(TimeSpec::from_seconds)
        });
        if duration.is_none() {
            warn!(
                "Duration of {} is unknown; trimming relies on --max-duration alone",
                file_path.display()
            );
        }

        let has_audio = input.streams().best(media::Type::Audio).is_some();

        let (coded_width, coded_height) = (decoder.width(), decoder.height());
        let rotation = match tagged_rotation {
            Some(rotation) => rotation,
            None => Self::first_frame_rotation(&mut input, stream_index, &mut decoder),
        };
        let (width, height) = rotation.display_size(coded_width, coded_height);

        let info = SourceInfo::new(width, height, frame_rate, duration, has_audio, codec_name)?
            .with_rotation(rotation);
        debug!("Probed {}: {:?}", file_path.display(), info);
        Ok(info)
    }

    /// Rotation from the display matrix attached to the first decoded frame
    fn first_frame_rotation(
        input: &mut format::context::Input,
        stream_index: usize,
        decoder: &mut decoder::Video,
    ) -> Rotation {
        let mut frame = VideoFrame::empty();
        let mut decoded = false;
        for (stream, packet) in input.packets() {
            if stream.index() != stream_index || decoder.send_packet(&packet).is_err() {
                continue;
            }
            if decoder.receive_frame(&mut frame).is_ok() {
                decoded = true;
                break;
            }
        }
        if !decoded {
            decoded = decoder.send_eof().is_ok() && decoder.receive_frame(&mut frame).is_ok();
        }
        if !decoded {
            debug!("No frame decoded while reading display rotation");
            return Rotation::None;
        }

        frame
            .side_data(side_data::Type::DisplayMatrix)
            .and_then(|data| rotation_from_display_matrix(data.data()))
            .unwrap_or_default()
    }

    fn container_duration(input: &format::context::Input) -> Option<TimeSpec> {
        let duration = input.duration();
        (duration > 0).then(|| {
            TimeSpec::from_seconds(duration as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE))
        })
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_source(&self, file_path: &Path) -> Result<SourceInfo, DomainError> {
        Self::probe_blocking(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_probe_rejects_non_media_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.mp4");
        std::fs::write(&path, b"fake video data").unwrap();

        let _adapter = ProbeLibavAdapter::new().unwrap();
        let result = ProbeLibavAdapter::probe_blocking(&path);
        assert!(matches!(result, Err(DomainError::ProbeFail(_))));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let adapter = ProbeLibavAdapter::new().unwrap();
        let result = adapter.probe_source(Path::new("non_existent_file.mp4")).await;
        assert!(result.is_err());
    }
}
