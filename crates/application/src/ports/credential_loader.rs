use knife_dns_domain::{DomainError, KnifeConfig};
use std::path::Path;

use super::EnvironmentStore;

/// Loads a domain's credential file on top of an existing configuration.
///
/// Loading the same file twice into equal configurations yields equal results.
pub trait CredentialLoader: Send + Sync {
    fn load(
        &self,
        path: &Path,
        config: &mut KnifeConfig,
        environment: &dyn EnvironmentStore,
    ) -> Result<(), DomainError>;
}
