// Clip interactor - Orchestrates the square crop use case

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the crop/trim/resize use case
pub struct ClipInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl ClipInteractor {
    /// Create new clip interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            fs_port,
            log_port,
        }
    }

    /// Validate, probe, plan and execute a crop run.
    ///
    /// Nothing is created or opened until every parameter has been checked.
    pub async fn execute(
        &self,
        request: ClipRequest,
        encoder: EncoderSettings,
    ) -> Result<OutputReport, DomainError> {
        self.log_port
            .info(&format!(
                "Starting square crop for file: {}",
                request.input_path.display()
            ))
            .await;

        let input_exists = self.fs_port.file_exists(&request.input_path).await?;
        if let Err(e) = ParameterValidator::validate(&request, input_exists)
            .and_then(|_| ParameterValidator::validate_encoder(&encoder))
        {
            self.log_port.error(&format!("Rejected request: {}", e)).await;
            return Err(e);
        }

        self.fs_port
            .create_parent_directories(&request.output_path)
            .await?;

        let source = self.probe_port.probe_source(&request.input_path).await?;
        self.log_port
            .info(&format!(
                "Source probed: {}x{} @ {:.3} fps, duration: {}, audio: {}",
                source.width,
                source.height,
                source.frame_rate,
                source
                    .duration
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                source.has_audio
            ))
            .await;

        let plan = PlanBuilder::build(&request, &source, &encoder)?;
        self.log_plan(&request, &source, &plan).await;

        let report = self.execute_port.execute_plan(&plan).await?;
        if self.fs_port.get_file_size(&report.output_path).await? == 0 {
            return Err(DomainError::ProcessingError(format!(
                "Encoder produced an empty output file: {}",
                report.output_path.display()
            )));
        }
        self.log_port
            .info(&format!(
                "Square crop completed: {} frames, {} bytes, output: {}",
                report.frames_written,
                report.file_size,
                report.output_path.display()
            ))
            .await;

        Ok(report)
    }

    async fn log_plan(&self, request: &ClipRequest, source: &SourceInfo, plan: &TransformPlan) {
        self.log_port
            .info(&format!(
                "Crop {} to {}x{} ({}), trim {:.3}s",
                plan.crop, plan.output_width, plan.output_height, plan.chroma, plan.trim_duration
            ))
            .await;

        if request.keep_audio && !source.has_audio {
            self.log_port
                .warn("Audio requested but the source has no audio track; output will be silent")
                .await;
        }
        if plan.resizes() {
            self.log_port
                .debug(&format!(
                    "Resizing {}px square to {}px",
                    plan.crop.side, plan.output_width
                ))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct MockProbe {
        info: SourceInfo,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProbePort for MockProbe {
        async fn probe_source(&self, _file_path: &Path) -> Result<SourceInfo, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.info.clone())
        }
    }

    #[derive(Default)]
    struct MockExecute {
        plans: Mutex<Vec<TransformPlan>>,
    }

    #[async_trait]
    impl ExecutePort for MockExecute {
        async fn execute_plan(&self, plan: &TransformPlan) -> Result<OutputReport, DomainError> {
            self.plans.lock().unwrap().push(plan.clone());
            Ok(OutputReport {
                output_path: plan.output_path.clone(),
                width: plan.output_width,
                height: plan.output_height,
                frames_written: (plan.trim_duration * plan.frame_rate) as u64,
                duration: plan.trim_duration,
                audio_included: plan.include_audio,
                file_size: 1024,
                processing_time: Duration::from_millis(5),
                completed_at: chrono::Utc::now(),
            })
        }
    }

    struct MockFs {
        exists: bool,
        created: AtomicUsize,
    }

    #[async_trait]
    impl FsPort for MockFs {
        async fn file_exists(&self, _file_path: &Path) -> Result<bool, DomainError> {
            Ok(self.exists)
        }

        async fn create_parent_directories(&self, _file_path: &Path) -> Result<(), DomainError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn get_file_size(&self, _file_path: &Path) -> Result<u64, DomainError> {
            Ok(1024)
        }
    }

    struct Harness {
        probe: Arc<MockProbe>,
        execute: Arc<MockExecute>,
        fs: Arc<MockFs>,
        interactor: ClipInteractor,
    }

    fn harness(exists: bool, has_audio: bool) -> Harness {
        let info = SourceInfo::new(
            1920,
            1080,
            30.0,
            Some(TimeSpec::from_seconds(10.0)),
            has_audio,
            "h264".to_string(),
        )
        .unwrap();
        let probe = Arc::new(MockProbe {
            info,
            calls: AtomicUsize::new(0),
        });
        let execute = Arc::new(MockExecute::default());
        let fs = Arc::new(MockFs {
            exists,
            created: AtomicUsize::new(0),
        });
        let interactor = ClipInteractor::new(
            Arc::clone(&probe) as Arc<dyn ProbePort>,
            Arc::clone(&execute) as Arc<dyn ExecutePort>,
            Arc::clone(&fs) as Arc<dyn FsPort>,
            Arc::new(crate::adapters::TracingLogAdapter::new().unwrap()),
        );
        Harness {
            probe,
            execute,
            fs,
            interactor,
        }
    }

    fn request() -> ClipRequest {
        ClipRequest::new(PathBuf::from("in.mp4"), PathBuf::from("out/dir/out.mp4"))
    }

    #[tokio::test]
    async fn test_missing_input_never_probes() {
        let h = harness(false, false);
        let result = h.interactor.execute(request(), EncoderSettings::default()).await;

        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.fs.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_crop_percent_has_no_side_effects() {
        let h = harness(true, false);
        let result = h
            .interactor
            .execute(request().with_crop_percent(1.5), EncoderSettings::default())
            .await;

        assert!(matches!(result, Err(DomainError::BadArgs(_))));
        assert_eq!(h.fs.created.load(Ordering::SeqCst), 0);
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
        assert!(h.execute.plans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_encoder_settings_rejected_before_probe() {
        let h = harness(true, false);
        let encoder = EncoderSettings {
            crf: 60,
            ..EncoderSettings::default()
        };
        let result = h.interactor.execute(request(), encoder).await;

        assert!(matches!(result, Err(DomainError::BadArgs(_))));
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_happy_path_builds_centered_plan() {
        let h = harness(true, true);
        let report = h
            .interactor
            .execute(request(), EncoderSettings::default())
            .await
            .unwrap();

        assert_eq!(h.fs.created.load(Ordering::SeqCst), 1);
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 1);

        let plans = h.execute.plans.lock().unwrap();
        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.crop, CropRect { left: 582, top: 162, side: 756 });
        assert_eq!((plan.output_width, plan.output_height), (756, 756));
        assert_eq!(plan.trim_duration, 3.0);
        assert_eq!(plan.frame_rate, 30.0);
        assert!(!plan.include_audio);

        assert_eq!(report.width, 756);
        assert_eq!(report.output_path, PathBuf::from("out/dir/out.mp4"));
    }

    #[tokio::test]
    async fn test_audio_flag_requires_source_audio() {
        let with_audio = harness(true, true);
        with_audio
            .interactor
            .execute(request().with_audio(true), EncoderSettings::default())
            .await
            .unwrap();
        assert!(with_audio.execute.plans.lock().unwrap()[0].include_audio);

        let silent = harness(true, false);
        let report = silent
            .interactor
            .execute(request().with_audio(true), EncoderSettings::default())
            .await
            .unwrap();
        assert!(!silent.execute.plans.lock().unwrap()[0].include_audio);
        assert!(!report.audio_included);
    }

    #[tokio::test]
    async fn test_resize_and_trim_to_short_source() {
        let h = harness(true, false);
        let request = request().with_size(256).with_max_duration(30.0);
        h.interactor
            .execute(request, EncoderSettings::default())
            .await
            .unwrap();

        let plans = h.execute.plans.lock().unwrap();
        assert_eq!((plans[0].output_width, plans[0].output_height), (256, 256));
        assert_eq!(plans[0].trim_duration, 10.0);
        assert!(plans[0].resizes());
    }
}
