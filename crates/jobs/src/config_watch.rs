use crate::FileWatcher;
use knife_dns_application::use_cases::ReloadConfigUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Polls the domains file and the credential files it names, and hands
/// every change to [`ReloadConfigUseCase::handle_change`].
pub struct ConfigWatchJob {
    reload: Arc<ReloadConfigUseCase>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ConfigWatchJob {
    pub fn new(reload: Arc<ReloadConfigUseCase>) -> Self {
        Self {
            reload,
            interval: Duration::from_secs(1),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Baseline the tracked files now and poll them on a background task.
    pub fn start(self) -> JoinHandle<()> {
        let mut watcher = FileWatcher::new(self.reload.tracked_files());
        info!(
            files = watcher.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting config watch job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => {
                        info!("ConfigWatchJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => self.dispatch(&mut watcher).await,
                }
            }
        })
    }

    /// Hand each changed path to the reload use case. Nothing is dispatched
    /// once the token is cancelled, and an in-flight reload is abandoned.
    async fn dispatch(&self, watcher: &mut FileWatcher) {
        for path in watcher.poll_changes() {
            if self.shutdown.is_cancelled() {
                return;
            }
            debug!(path = %path.display(), "Tracked file changed");

            let tracked = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return,
                tracked = self.reload.handle_change(&path) => tracked,
            };
            if let Some(tracked) = tracked {
                watcher.set_paths(tracked);
            }
        }
    }
}
