use arc_swap::ArcSwap;
use knife_dns_domain::{DomainError, DomainPayload, DomainRegistry, ExecutionContext};
use std::sync::Arc;
use tracing::info;

use super::ContextCache;

/// A registry snapshot together with the cache generation observed before it.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub registry: Arc<DomainRegistry>,
    pub generation: u64,
}

/// Current domain registry plus the context cache bound to its payloads.
///
/// The registry is swapped atomically via `ArcSwap`; a swap and the matching
/// cache invalidation happen under the cache lock, so contexts built against
/// a replaced registry are never stored.
pub struct DomainDirectory {
    registry: ArcSwap<DomainRegistry>,
    contexts: Arc<ContextCache>,
}

impl DomainDirectory {
    pub fn new(registry: DomainRegistry, contexts: Arc<ContextCache>) -> Self {
        Self {
            registry: ArcSwap::from_pointee(registry),
            contexts,
        }
    }

    pub fn registry(&self) -> Arc<DomainRegistry> {
        self.registry.load_full()
    }

    pub fn contexts(&self) -> &Arc<ContextCache> {
        &self.contexts
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        let generation = self.contexts.generation().await;
        DirectorySnapshot {
            registry: self.registry.load_full(),
            generation,
        }
    }

    pub async fn context_for(
        &self,
        snapshot: &DirectorySnapshot,
        payload: &DomainPayload,
    ) -> Result<Arc<ExecutionContext>, DomainError> {
        self.contexts.ensure_at(payload, snapshot.generation).await
    }

    /// Install a new registry and drop every cached context.
    pub async fn replace(&self, registry: DomainRegistry) -> usize {
        let registry = Arc::new(registry);
        let entries = registry.len();
        let cleared = self
            .contexts
            .invalidate_all_with(|| self.registry.store(registry))
            .await;
        info!(entries, cleared, "Domain registry replaced");
        cleared
    }

    pub async fn invalidate_contexts(&self) -> usize {
        self.contexts.invalidate_all().await
    }
}
