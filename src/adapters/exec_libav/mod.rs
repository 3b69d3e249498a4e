//! FFmpeg execution adapter using libav bindings
//!
//! Decodes the source video, crops every frame to the planned square and
//! re-encodes at the source frame rate. With audio enabled the source track
//! is decoded and re-encoded with the output container's default audio codec.
//! Both tracks are cut to the same trim window.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use ffmpeg_next::codec::{self, Capabilities, Id};
use ffmpeg_next::format::{self, context::Output, Sample};
use ffmpeg_next::software::resampling;
use ffmpeg_next::util::frame::audio::Audio as AudioFrame;
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use ffmpeg_next::util::picture;
use ffmpeg_next::{decoder, encoder, media, ChannelLayout, Codec, Dictionary, Packet, Rational};
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{pixel_format_for, timestamp_seconds, SquareCropper};
use crate::ports::*;

/// Samples per encoder frame for codecs that accept any frame size
const VARIABLE_FRAME_SAMPLES: usize = 1024;

const AUDIO_BIT_RATE: usize = 128_000;

/// FFmpeg execution adapter using libav FFI
#[derive(Debug)]
pub struct ExecLibavAdapter;

impl ExecLibavAdapter {
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg_next::init()
            .map_err(|e| DomainError::ProcessingError(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }

    /// Run the whole pipeline synchronously
    pub fn execute_blocking(plan: &TransformPlan) -> Result<OutputReport, DomainError> {
        let started = Instant::now();
        info!(
            "Cropping {} to {} ({}), keeping {:.3}s",
            plan.input_path.display(),
            plan.crop,
            plan.chroma,
            plan.trim_duration
        );

        let outcome = run_pipeline(plan)?;

        let file_size = std::fs::metadata(&plan.output_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to get output file size: {}", e)))?
            .len();

        let processing_time = started.elapsed();
        info!(
            "Wrote {} frames to {} in {:.2}s",
            outcome.frames_written,
            plan.output_path.display(),
            processing_time.as_secs_f64()
        );

        Ok(OutputReport {
            output_path: plan.output_path.clone(),
            width: plan.output_width,
            height: plan.output_height,
            frames_written: outcome.frames_written,
            duration: outcome.frames_written as f64 / plan.frame_rate,
            audio_included: outcome.audio_included,
            file_size,
            processing_time,
            completed_at: chrono::Utc::now(),
        })
    }
}

#[async_trait]
impl ExecutePort for ExecLibavAdapter {
    async fn execute_plan(&self, plan: &TransformPlan) -> Result<OutputReport, DomainError> {
        Self::execute_blocking(plan)
    }
}

/// Opened source file; its demuxer is closed when this is dropped
struct SourceClip {
    path: PathBuf,
    input: format::context::Input,
}

impl SourceClip {
    fn open(path: &Path) -> Result<Self, DomainError> {
        let input = format::input(path).map_err(|e| {
            DomainError::ProcessingError(format!("Failed to open input file {}: {}", path.display(), e))
        })?;
        debug!("Opened source clip {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            input,
        })
    }
}

impl Drop for SourceClip {
    fn drop(&mut self) {
        debug!("Released source clip {}", self.path.display());
    }
}

struct PipelineOutcome {
    frames_written: u64,
    audio_included: bool,
}

/// Trim window shared by the video and audio routes.
///
/// Times are measured from the earliest declared start of the selected
/// streams, or from the first timestamp seen when no stream declares one.
#[derive(Debug, Clone)]
struct TrimWindow {
    origin: Option<f64>,
    duration: f64,
}

impl TrimWindow {
    fn new(stream_starts: &[Option<f64>], duration: f64) -> Self {
        Self {
            origin: stream_starts.iter().flatten().copied().reduce(f64::min),
            duration,
        }
    }

    /// Seconds from the window origin to `seconds`
    fn offset(&mut self, seconds: f64) -> f64 {
        seconds - *self.origin.get_or_insert(seconds)
    }
}

/// Declared start of a stream in seconds
fn stream_start(stream: &format::stream::Stream) -> Option<f64> {
    let start = stream.start_time();
    (start != ffmpeg_next::ffi::AV_NOPTS_VALUE).then(|| timestamp_seconds(start, stream.time_base()))
}

/// Video half of the pipeline: decoder, cropper and encoder
struct VideoRoute {
    input_index: usize,
    input_time_base: Rational,
    decoder: decoder::Video,
    cropper: SquareCropper,
    encoder: encoder::video::Encoder,
    encoder_time_base: Rational,
    output_index: usize,
    output_time_base: Rational,
    frame_rate: f64,
    first_index: Option<i64>,
    frames_written: u64,
    finished: bool,
}

impl VideoRoute {
    fn send_packet(
        &mut self,
        packet: &Packet,
        octx: &mut Output,
        window: &mut TrimWindow,
    ) -> Result<(), DomainError> {
        if self.finished {
            return Ok(());
        }
        self.decoder
            .send_packet(packet)
            .map_err(|e| DomainError::ProcessingError(format!("Failed to send packet to decoder: {}", e)))?;
        self.drain_decoder(octx, window)
    }

    fn drain_decoder(&mut self, octx: &mut Output, window: &mut TrimWindow) -> Result<(), DomainError> {
        let mut decoded = VideoFrame::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            if self.finished {
                continue;
            }

            let elapsed = decoded
                .timestamp()
                .map(|timestamp| window.offset(timestamp_seconds(timestamp, self.input_time_base)));
            // Frame slot of the first kept frame, so video starting after audio keeps its offset
            let frame_rate = self.frame_rate;
            let first_index = *self.first_index.get_or_insert_with(|| {
                elapsed.map_or(0, |seconds| (seconds.max(0.0) * frame_rate + 1e-6).floor() as i64)
            });
            let position = first_index + self.frames_written as i64;

            let past_window = elapsed.is_some_and(|seconds| seconds >= window.duration);
            if past_window || position as f64 / self.frame_rate >= window.duration {
                debug!("Trim point reached after {} frames", self.frames_written);
                self.finished = true;
                continue;
            }

            let mut square = self.cropper.process(&decoded)?;
            square.set_pts(Some(position));
            square.set_kind(picture::Type::None);

            self.encoder
                .send_frame(&square)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to send frame to encoder: {}", e)))?;
            self.write_encoded(octx)?;
            self.frames_written += 1;
        }
        Ok(())
    }

    fn write_encoded(&mut self, octx: &mut Output) -> Result<(), DomainError> {
        let mut encoded = Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            if encoded.duration() == 0 {
                encoded.set_duration(1);
            }
            encoded.set_stream(self.output_index);
            encoded.rescale_ts(self.encoder_time_base, self.output_time_base);
            encoded
                .write_interleaved(octx)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to write encoded packet: {}", e)))?;
        }
        Ok(())
    }

    fn finish(&mut self, octx: &mut Output, window: &mut TrimWindow) -> Result<(), DomainError> {
        if !self.finished {
            self.decoder
                .send_eof()
                .map_err(|e| DomainError::ProcessingError(format!("Failed to flush video decoder: {}", e)))?;
            self.drain_decoder(octx, window)?;
        }

        self.encoder
            .send_eof()
            .map_err(|e| DomainError::ProcessingError(format!("Failed to flush video encoder: {}", e)))?;
        self.write_encoded(octx)
    }
}

/// Decoded samples waiting for a full encoder frame, one byte buffer per plane
struct SampleFifo {
    format: Sample,
    layout: ChannelLayout,
    rate: u32,
    planes: Vec<Vec<u8>>,
    sample_bytes: usize,
    len: usize,
}

impl SampleFifo {
    fn new(format: Sample, layout: ChannelLayout, rate: u32) -> Self {
        let channels = layout.channels().max(1) as usize;
        let (plane_count, sample_bytes) = if format.is_planar() {
            (channels, format.bytes())
        } else {
            (1, format.bytes() * channels)
        };
        Self {
            format,
            layout,
            rate,
            planes: vec![Vec::new(); plane_count],
            sample_bytes,
            len: 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Append the first `samples` samples of a frame in the FIFO's format
    fn push(&mut self, frame: &AudioFrame, samples: usize) {
        let bytes = samples * self.sample_bytes;
        for (plane, buffer) in self.planes.iter_mut().enumerate() {
            buffer.extend_from_slice(&frame.data(plane)[..bytes]);
        }
        self.len += samples;
    }

    /// Remove `samples` samples as a frame of `frame_samples`, zero-filling the rest
    fn pop(&mut self, samples: usize, frame_samples: usize) -> AudioFrame {
        let samples = samples.min(self.len);
        let bytes = samples * self.sample_bytes;
        let total = frame_samples.max(samples) * self.sample_bytes;

        let mut frame = AudioFrame::new(self.format, frame_samples.max(samples), self.layout);
        frame.set_rate(self.rate);
        for (plane, buffer) in self.planes.iter_mut().enumerate() {
            let data = frame.data_mut(plane);
            data[..bytes].copy_from_slice(&buffer[..bytes]);
            data[bytes..total].fill(0);
            buffer.drain(..bytes);
        }
        self.len -= samples;
        frame
    }
}

/// Audio half of the pipeline: decoder, resampler, sample FIFO and encoder
struct AudioRoute {
    input_index: usize,
    input_time_base: Rational,
    decoder: decoder::Audio,
    resampler: Option<(resampling::Context, (Sample, ChannelLayout, u32))>,
    encoder: encoder::audio::Encoder,
    fifo: SampleFifo,
    frame_size: usize,
    pad_last_frame: bool,
    output_index: usize,
    output_time_base: Rational,
    sample_limit: i64,
    next_pts: Option<i64>,
    finished: bool,
}

impl AudioRoute {
    fn encoder_time_base(&self) -> Rational {
        Rational::new(1, self.fifo.rate as i32)
    }

    fn send_packet(
        &mut self,
        packet: &Packet,
        octx: &mut Output,
        window: &mut TrimWindow,
    ) -> Result<(), DomainError> {
        if self.finished {
            return Ok(());
        }
        self.decoder
            .send_packet(packet)
            .map_err(|e| DomainError::ProcessingError(format!("Failed to send packet to audio decoder: {}", e)))?;
        self.drain_decoder(octx, window)
    }

    fn drain_decoder(&mut self, octx: &mut Output, window: &mut TrimWindow) -> Result<(), DomainError> {
        let mut raw = AudioFrame::empty();
        while self.decoder.receive_frame(&mut raw).is_ok() {
            if self.finished || raw.samples() == 0 {
                continue;
            }

            let start_pts = match raw.timestamp() {
                Some(timestamp) => {
                    let elapsed = window.offset(timestamp_seconds(timestamp, self.input_time_base));
                    let span = raw.samples() as f64 / f64::from(raw.rate().max(1));
                    if elapsed + span <= 0.0 {
                        continue;
                    }
                    if elapsed >= window.duration {
                        debug!("Audio trim point reached");
                        self.finished = true;
                        continue;
                    }
                    (elapsed.max(0.0) * f64::from(self.fifo.rate)).round() as i64
                }
                None => 0,
            };
            let next_pts = *self.next_pts.get_or_insert(start_pts);

            let converted = self.convert(&mut raw)?;
            let room = self.sample_limit - next_pts - self.fifo.len() as i64;
            let take = (converted.samples() as i64).clamp(0, room.max(0)) as usize;
            self.fifo.push(&converted, take);
            if take as i64 >= room {
                debug!("Audio trim point reached");
                self.finished = true;
            }
            self.encode_queued(octx, false)?;
        }
        Ok(())
    }

    /// Resample a decoded frame to the encoder's format, layout and rate
    fn convert(&mut self, raw: &mut AudioFrame) -> Result<AudioFrame, DomainError> {
        if raw.channel_layout().is_empty() {
            raw.set_channel_layout(ChannelLayout::default(raw.channels() as i32));
        }
        let input_key = (raw.format(), raw.channel_layout(), raw.rate());
        let stale = match &self.resampler {
            Some((_, key)) => *key != input_key,
            None => true,
        };
        if stale {
            debug!(
                "Creating audio resampler for {:?} {} channels @ {} Hz",
                input_key.0,
                input_key.1.channels(),
                input_key.2
            );
            let resampler = resampling::Context::get(
                input_key.0,
                input_key.1,
                input_key.2,
                self.fifo.format,
                self.fifo.layout,
                self.fifo.rate,
            )
            .map_err(|e| DomainError::ProcessingError(format!("Failed to create audio resampler: {}", e)))?;
            self.resampler = Some((resampler, input_key));
        }

        let mut converted = AudioFrame::empty();
        if let Some((resampler, _)) = self.resampler.as_mut() {
            resampler
                .run(raw, &mut converted)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to resample audio: {}", e)))?;
        }
        Ok(converted)
    }

    /// Encode every full frame in the FIFO, and the remainder when flushing
    fn encode_queued(&mut self, octx: &mut Output, flush: bool) -> Result<(), DomainError> {
        while self.fifo.len() >= self.frame_size || (flush && self.fifo.len() > 0) {
            let samples = self.fifo.len().min(self.frame_size);
            let frame_samples = if self.pad_last_frame { self.frame_size } else { samples };
            let mut frame = self.fifo.pop(samples, frame_samples);

            let pts = self.next_pts.unwrap_or(0);
            frame.set_pts(Some(pts));
            self.next_pts = Some(pts + samples as i64);

            self.encoder
                .send_frame(&frame)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to send audio frame to encoder: {}", e)))?;
            self.write_encoded(octx)?;
        }
        Ok(())
    }

    fn write_encoded(&mut self, octx: &mut Output) -> Result<(), DomainError> {
        let encoder_time_base = self.encoder_time_base();
        let mut encoded = Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.output_index);
            encoded.rescale_ts(encoder_time_base, self.output_time_base);
            encoded
                .write_interleaved(octx)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to write audio packet: {}", e)))?;
        }
        Ok(())
    }

    fn finish(&mut self, octx: &mut Output, window: &mut TrimWindow) -> Result<(), DomainError> {
        if !self.finished {
            self.decoder
                .send_eof()
                .map_err(|e| DomainError::ProcessingError(format!("Failed to flush audio decoder: {}", e)))?;
            self.drain_decoder(octx, window)?;
        }
        self.encode_queued(octx, true)?;

        self.encoder
            .send_eof()
            .map_err(|e| DomainError::ProcessingError(format!("Failed to flush audio encoder: {}", e)))?;
        self.write_encoded(octx)
    }
}

fn run_pipeline(plan: &TransformPlan) -> Result<PipelineOutcome, DomainError> {
    let mut source = SourceClip::open(&plan.input_path)?;

    let (video_input, audio_input, stream_starts) = {
        let streams = source.input.streams();
        let video = streams
            .best(media::Type::Video)
            .ok_or_else(|| DomainError::ProcessingError("No video stream found in input file".to_string()))?;
        let audio = if plan.include_audio {
            source.input.streams().best(media::Type::Audio)
        } else {
            None
        };
        let starts = [Some(&video), audio.as_ref()].map(|stream| stream.and_then(stream_start));
        (
            (video.index(), video.time_base(), video.parameters()),
            audio.map(|stream| (stream.index(), stream.time_base(), stream.parameters())),
            starts,
        )
    };
    if plan.include_audio && audio_input.is_none() {
        warn!("Audio was requested but the source has no audio stream");
    }
    let mut window = TrimWindow::new(&stream_starts, plan.trim_duration);

    let decoder = codec::context::Context::from_parameters(video_input.2)
        .map_err(|e| DomainError::ProcessingError(format!("Failed to create decoder context: {}", e)))?
        .decoder()
        .video()
        .map_err(|e| DomainError::ProcessingError(format!("Failed to create video decoder: {}", e)))?;
    let cropper = SquareCropper::new(
        plan.crop,
        (decoder.width(), decoder.height()),
        (plan.output_width, plan.output_height),
        plan.chroma,
        plan.rotation,
    )?;

    let mut octx = format::output(&plan.output_path).map_err(|e| {
        DomainError::ProcessingError(format!(
            "Failed to create output file {}: {}",
            plan.output_path.display(),
            e
        ))
    })?;

    let (encoder, encoder_time_base, video_output_index) = open_video_encoder(plan, &mut octx)?;

    let mut audio = match audio_input {
        Some((input_index, input_time_base, parameters)) => {
            let audio_decoder = codec::context::Context::from_parameters(parameters)
                .map_err(|e| DomainError::ProcessingError(format!("Failed to create audio decoder context: {}", e)))?
                .decoder()
                .audio()
                .map_err(|e| DomainError::ProcessingError(format!("Failed to create audio decoder: {}", e)))?;
            Some(open_audio_route(
                plan,
                &mut octx,
                audio_decoder,
                input_index,
                input_time_base,
            )?)
        }
        None => None,
    };

    octx.write_header()
        .map_err(|e| DomainError::ProcessingError(format!("Failed to write output header: {}", e)))?;

    let output_time_base = |octx: &Output, index: usize| {
        octx.stream(index)
            .map(|stream| stream.time_base())
            .ok_or_else(|| DomainError::ProcessingError(format!("Output stream {} missing", index)))
    };

    let mut video = VideoRoute {
        input_index: video_input.0,
        input_time_base: video_input.1,
        decoder,
        cropper,
        encoder,
        encoder_time_base,
        output_index: video_output_index,
        output_time_base: output_time_base(&octx, video_output_index)?,
        frame_rate: plan.frame_rate,
        first_index: None,
        frames_written: 0,
        finished: false,
    };
    if let Some(route) = audio.as_mut() {
        route.output_time_base = output_time_base(&octx, route.output_index)?;
    }

    for (stream, packet) in source.input.packets() {
        let index = stream.index();
        if index == video.input_index {
            video.send_packet(&packet, &mut octx, &mut window)?;
        } else if let Some(route) = audio.as_mut().filter(|route| route.input_index == index) {
            route.send_packet(&packet, &mut octx, &mut window)?;
        }

        let audio_finished = audio.as_ref().map_or(true, |route| route.finished);
        if video.finished && audio_finished {
            break;
        }
    }

    video.finish(&mut octx, &mut window)?;
    if let Some(route) = audio.as_mut() {
        route.finish(&mut octx, &mut window)?;
    }

    octx.write_trailer()
        .map_err(|e| DomainError::ProcessingError(format!("Failed to write output trailer: {}", e)))?;

    Ok(PipelineOutcome {
        frames_written: video.frames_written,
        audio_included: audio.is_some(),
    })
}

/// Configure and open the audio encoder, adding its output stream
fn open_audio_route(
    plan: &TransformPlan,
    octx: &mut Output,
    decoder: decoder::Audio,
    input_index: usize,
    input_time_base: Rational,
) -> Result<AudioRoute, DomainError> {
    let codec = find_audio_encoder(octx, &plan.output_path)?;
    let global_header = octx.format().flags().contains(format::Flags::GLOBAL_HEADER);
    let audio_codec = codec
        .audio()
        .map_err(|e| DomainError::ProcessingError(format!("{} is not an audio encoder: {}", codec.name(), e)))?;

    let sample_format = audio_codec
        .formats()
        .and_then(|mut formats| formats.next())
        .unwrap_or(Sample::F32(format::sample::Type::Planar));
    let rate = match audio_codec.rates() {
        Some(rates) => {
            let rates: Vec<i32> = rates.collect();
            if rates.is_empty() || rates.contains(&(decoder.rate() as i32)) {
                decoder.rate()
            } else if rates.contains(&48_000) {
                48_000
            } else {
                rates[0] as u32
            }
        }
        None => decoder.rate(),
    };
    let layout = if decoder.channels() >= 2 {
        ChannelLayout::STEREO
    } else {
        ChannelLayout::MONO
    };
    let time_base = Rational::new(1, rate as i32);

    let mut audio_encoder = codec::context::Context::new_with_codec(codec)
        .encoder()
        .audio()
        .map_err(|e| DomainError::ProcessingError(format!("Failed to create audio encoder: {}", e)))?;
    audio_encoder.set_rate(rate as i32);
    audio_encoder.set_channel_layout(layout);
    audio_encoder.set_format(sample_format);
    audio_encoder.set_bit_rate(AUDIO_BIT_RATE);
    audio_encoder.set_time_base(time_base);
    if global_header {
        audio_encoder.set_flags(codec::Flags::GLOBAL_HEADER);
    }

    let opened = audio_encoder
        .open_as_with(codec, Dictionary::new())
        .map_err(|e| DomainError::ProcessingError(format!("Failed to open audio encoder: {}", e)))?;

    let mut stream = octx
        .add_stream(codec)
        .map_err(|e| DomainError::ProcessingError(format!("Failed to add audio stream: {}", e)))?;
    stream.set_parameters(&opened);
    stream.set_time_base(time_base);
    let output_index = stream.index();

    let variable_frames = codec.capabilities().contains(Capabilities::VARIABLE_FRAME_SIZE);
    let frame_size = match opened.frame_size() as usize {
        0 => VARIABLE_FRAME_SAMPLES,
        size => size,
    };
    let pad_last_frame = !variable_frames
        && opened.frame_size() > 0
        && !codec.capabilities().contains(Capabilities::SMALL_LAST_FRAME);

    debug!(
        "Opened {} audio encoder: {:?}, {} channels @ {} Hz, {} samples per frame",
        codec.name(),
        sample_format,
        layout.channels(),
        rate,
        frame_size
    );

    Ok(AudioRoute {
        input_index,
        input_time_base,
        decoder,
        resampler: None,
        encoder: opened,
        fifo: SampleFifo::new(sample_format, layout, rate),
        frame_size,
        pad_last_frame,
        output_index,
        output_time_base: time_base,
        sample_limit: (plan.trim_duration * f64::from(rate)).round() as i64,
        next_pts: None,
        finished: false,
    })
}

/// The container's default audio encoder, falling back to AAC
fn find_audio_encoder(octx: &Output, output_path: &Path) -> Result<Codec, DomainError> {
    let preferred = octx.format().codec(output_path, media::Type::Audio);
    if let Some(codec) = Some(preferred).filter(|id| *id != Id::None).and_then(encoder::find) {
        return Ok(codec);
    }
    warn!("No default audio encoder for {}, using AAC", output_path.display());
    encoder::find(Id::AAC).ok_or_else(|| DomainError::ProcessingError("No AAC encoder available".to_string()))
}

/// Configure and open the video encoder, adding its output stream
fn open_video_encoder(
    plan: &TransformPlan,
    octx: &mut Output,
) -> Result<(encoder::video::Encoder, Rational, usize), DomainError> {
    let codec = find_video_encoder(&plan.encoder.codec)?;
    let global_header = octx.format().flags().contains(format::Flags::GLOBAL_HEADER);

    let frame_rate = Rational::from(plan.frame_rate).reduce();
    let time_base = frame_rate.invert();

    let mut video_encoder = codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .map_err(|e| DomainError::ProcessingError(format!("Failed to create video encoder: {}", e)))?;

    video_encoder.set_width(plan.output_width);
    video_encoder.set_height(plan.output_height);
    video_encoder.set_format(pixel_format_for(plan.chroma));
    video_encoder.set_time_base(time_base);
    video_encoder.set_frame_rate(Some(frame_rate));
    video_encoder.set_aspect_ratio(Rational::new(1, 1));
    if global_header {
        video_encoder.set_flags(codec::Flags::GLOBAL_HEADER);
    }

    let mut options = Dictionary::new();
    options.set("preset", &plan.encoder.preset);
    options.set("crf", &plan.encoder.crf.to_string());
    options.set("threads", &plan.encoder.threads.to_string());

    let opened = video_encoder
        .open_as_with(codec, options)
        .map_err(|e| DomainError::ProcessingError(format!("Failed to open video encoder: {}", e)))?;

    let mut stream = octx
        .add_stream(codec)
        .map_err(|e| DomainError::ProcessingError(format!("Failed to add video stream: {}", e)))?;
    stream.set_parameters(&opened);
    stream.set_time_base(time_base);
    let index = stream.index();

    debug!(
        "Opened {} encoder: {}x{} {} @ {}/{} fps",
        codec.name(),
        plan.output_width,
        plan.output_height,
        plan.chroma,
        frame_rate.numerator(),
        frame_rate.denominator()
    );
    Ok((opened, time_base, index))
}

/// Look up an encoder by name, falling back to any H.264 encoder
fn find_video_encoder(name: &str) -> Result<Codec, DomainError> {
    if let Some(codec) = encoder::find_by_name(name) {
        return Ok(codec);
    }
    warn!("Encoder {} not available, falling back to the default H.264 encoder", name);
    encoder::find(Id::H264)
        .ok_or_else(|| DomainError::ProcessingError("No H.264 encoder available".to_string()))
}
