use knife_dns_domain::{DomainError, DomainName, DomainRegistry, DomainsConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::services::DomainDirectory;

/// Reacts to changes of the domains file and the credential files it names.
pub struct ReloadConfigUseCase {
    config_path: PathBuf,
    base_zone: DomainName,
    directory: Arc<DomainDirectory>,
}

impl ReloadConfigUseCase {
    pub fn new(
        config_path: impl Into<PathBuf>,
        base_zone: DomainName,
        directory: Arc<DomainDirectory>,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            base_zone,
            directory,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The domains file followed by every credential file of the current registry.
    pub fn tracked_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.config_path.clone()];
        for path in self.directory.registry().credential_files() {
            if !files.contains(&path) {
                files.push(path);
            }
        }
        files
    }

    /// Re-read the domains file and swap in the resulting registry.
    pub async fn execute(&self) -> Result<usize, DomainError> {
        let config = DomainsConfig::load(&self.config_path)?;
        let registry = DomainRegistry::build(&config, &self.base_zone)?;
        let entries = registry.len();
        self.directory.replace(registry).await;
        info!(domains = config.len(), entries, "Domains reloaded");
        Ok(entries)
    }

    /// Handle a change event for `path`.
    ///
    /// Returns the new tracked file set when the registry was reloaded.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn handle_change(&self, path: &Path) -> Option<Vec<PathBuf>> {
        if path != self.config_path {
            let cleared = self.directory.invalidate_contexts().await;
            info!(cleared, "Credential file changed; cached contexts cleared");
            return None;
        }

        if !path.exists() {
            warn!("Config file missing; keeping current domains");
            return None;
        }

        match self.execute().await {
            Ok(_) => Some(self.tracked_files()),
            Err(e) => {
                error!(error = %e, "Config reload failed; keeping current domains");
                None
            }
        }
    }
}
