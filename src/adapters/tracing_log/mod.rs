// Tracing log adapter - Structured logging using tracing crate

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Forwards port messages to `tracing`; the installed subscriber decides what is shown
#[derive(Debug, Default)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        info!("{}", message);
    }

    async fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    async fn error(&self, message: &str) {
        error!("{}", message);
    }

    async fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}
