//! Progress tracking and callback system for UI integration

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::model::BatchRun;

/// Progress callback trait for UI integration
pub trait ProgressCallback: Send + Sync {
    /// Called whenever the numeric progress or status text changes
    fn on_progress(&self, percent: u8, status: &str);

    /// Called for every line appended to the run log
    fn on_log(&self, line: &str);
}

/// Callback that forwards everything to `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingProgress;

impl ProgressCallback for TracingProgress {
    fn on_progress(&self, percent: u8, status: &str) {
        if status.is_empty() {
            debug!(percent, "progress");
        } else {
            info!(percent, "{}", status);
        }
    }

    fn on_log(&self, line: &str) {
        info!("{}", line);
    }
}

/// Writes progress into a `BatchRun` and notifies an optional observer
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<Arc<dyn ProgressCallback>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: Arc<dyn ProgressCallback>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Set progress and status text together
    pub fn update(&self, run: &mut BatchRun, percent: u8, status: impl Into<String>) {
        run.progress = percent.min(100);
        run.status_text = status.into();
        if let Some(callback) = &self.callback {
            callback.on_progress(run.progress, &run.status_text);
        }
    }

    /// Append a line to the run log
    pub fn log(&self, run: &mut BatchRun, line: impl Into<String>) {
        let line = line.into();
        if let Some(callback) = &self.callback {
            callback.on_log(&line);
        }
        run.push_log(line);
    }
}
