pub mod config_watch;
pub mod file_watcher;
pub mod runner;

pub use config_watch::ConfigWatchJob;
pub use file_watcher::FileWatcher;
pub use runner::JobRunner;
