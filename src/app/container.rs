use std::sync::Arc;

use crate::adapters::{
    ExecLibavAdapter, FileConfigAdapter, FsLocalAdapter, ProbeLibavAdapter, TracingLogAdapter,
};
use crate::app::clip_interactor::ClipInteractor;
use crate::domain::errors::DomainError;
use crate::ports::{ConfigPort, ExecutePort, FsPort, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn clip_interactor(&self) -> Arc<ClipInteractor>;
    fn config_port(&self) -> Arc<dyn ConfigPort>;
}

pub struct DefaultAppContainer {
    clip_interactor: Arc<ClipInteractor>,
    config_port: Arc<dyn ConfigPort>,
}

impl DefaultAppContainer {
    /// Wire the libav and local filesystem adapters
    pub fn new() -> Result<Self, DomainError> {
        let probe_port = Arc::new(ProbeLibavAdapter::new()?);
        let execute_port = Arc::new(ExecLibavAdapter::new()?);
        let fs_port = Arc::new(FsLocalAdapter::new()?);
        let config_port = Arc::new(FileConfigAdapter::new()?);
        let log_port = Arc::new(TracingLogAdapter::new()?);

        let clip_interactor = Arc::new(ClipInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&execute_port) as Arc<dyn ExecutePort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
        ));

        Ok(Self {
            clip_interactor,
            config_port: config_port as Arc<dyn ConfigPort>,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn clip_interactor(&self) -> Arc<ClipInteractor> {
        Arc::clone(&self.clip_interactor)
    }

    fn config_port(&self) -> Arc<dyn ConfigPort> {
        Arc::clone(&self.config_port)
    }
}
