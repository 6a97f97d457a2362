use crate::ConfigWatchJob;
use tokio::task::JoinHandle;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// let handles = JobRunner::new()
///     .with_config_watch(ConfigWatchJob::new(reload).with_cancellation(token))
///     .start();
/// ```
#[derive(Default)]
pub struct JobRunner {
    config_watch: Option<ConfigWatchJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_watch(mut self, job: ConfigWatchJob) -> Self {
        self.config_watch = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let mut handles = Vec::new();
        if let Some(job) = self.config_watch {
            handles.push(job.start());
        }

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}
