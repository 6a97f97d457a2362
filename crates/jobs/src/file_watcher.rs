use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Polls modification times of a fixed set of files.
///
/// A file that is missing is reported on every poll until it reappears;
/// a file whose mtime moved is reported once per move.
#[derive(Debug, Default)]
pub struct FileWatcher {
    entries: Vec<(PathBuf, Option<SystemTime>)>,
}

impl FileWatcher {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let mut watcher = Self::default();
        watcher.set_paths(paths);
        watcher
    }

    /// Replace the tracked set. Paths already tracked keep their recorded
    /// mtime; new paths are baselined now.
    pub fn set_paths(&mut self, paths: Vec<PathBuf>) {
        let previous = std::mem::take(&mut self.entries);
        for path in paths {
            if self.entries.iter().any(|(p, _)| *p == path) {
                continue;
            }
            let recorded = previous
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, mtime)| *mtime)
                .unwrap_or_else(|| modified(&path));
            self.entries.push((path, recorded));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths that changed since the previous poll, in tracking order.
    pub fn poll_changes(&mut self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for (path, recorded) in &mut self.entries {
            match modified(path) {
                None => changed.push(path.clone()),
                Some(current) if *recorded != Some(current) => {
                    *recorded = Some(current);
                    changed.push(path.clone());
                }
                Some(_) => {}
            }
        }
        changed
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
