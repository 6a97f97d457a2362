use arc_swap::ArcSwap;
use knife_dns_domain::{
    DomainError, DomainPayload, EnvSnapshot, ExecutionContext, KnifeConfig, PayloadId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::ports::{CredentialLoader, EnvironmentStore};

#[derive(Default)]
struct CacheState {
    /// Active configuration at first use. Never changes afterwards.
    baseline_config: Option<KnifeConfig>,
    /// Environment at first use. Never changes afterwards.
    baseline_env: Option<EnvSnapshot>,
    entries: HashMap<PayloadId, Arc<ExecutionContext>>,
    /// Bumped on every invalidation.
    generation: u64,
}

/// Memoizes one [`ExecutionContext`] per payload identity.
///
/// Building a context temporarily rewrites the shared environment, so every
/// build and every invalidation runs under the same lock.
pub struct ContextCache {
    loader: Arc<dyn CredentialLoader>,
    environment: Arc<dyn EnvironmentStore>,
    state: Mutex<CacheState>,
    active: ArcSwap<ExecutionContext>,
}

impl ContextCache {
    pub fn new(loader: Arc<dyn CredentialLoader>, environment: Arc<dyn EnvironmentStore>) -> Self {
        Self {
            loader,
            environment,
            state: Mutex::new(CacheState::default()),
            active: ArcSwap::from_pointee(ExecutionContext::default()),
        }
    }

    /// Seed the active configuration that later becomes the baseline.
    pub fn with_base_config(self, config: KnifeConfig) -> Self {
        self.active
            .store(Arc::new(ExecutionContext::new(config, EnvSnapshot::new())));
        self
    }

    /// The most recently installed context.
    pub fn active(&self) -> Arc<ExecutionContext> {
        self.active.load_full()
    }

    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Return the cached context for `payload`, building it on a miss.
    pub async fn ensure(
        &self,
        payload: &DomainPayload,
    ) -> Result<Arc<ExecutionContext>, DomainError> {
        let generation = self.generation().await;
        self.ensure_at(payload, generation).await
    }

    /// Like [`ensure`](Self::ensure), but a context built after the cache moved
    /// past `generation` is returned without being stored.
    #[instrument(skip(self, payload), fields(domain = payload.name()))]
    pub async fn ensure_at(
        &self,
        payload: &DomainPayload,
        generation: u64,
    ) -> Result<Arc<ExecutionContext>, DomainError> {
        let mut state = self.state.lock().await;

        if let Some(context) = state.entries.get(&payload.id()) {
            let context = Arc::clone(context);
            self.active.store(Arc::clone(&context));
            debug!("Execution context cache hit");
            return Ok(context);
        }

        let active = self.active.load_full();
        let mut config = state
            .baseline_config
            .get_or_insert_with(|| active.config.clone())
            .clone();
        let baseline_env = state
            .baseline_env
            .get_or_insert_with(|| self.environment.snapshot())
            .clone();

        for (key, value) in payload.env() {
            self.environment.set(key, value);
        }
        let loaded = self.loader.load(
            payload.credential_file(),
            &mut config,
            self.environment.as_ref(),
        );
        let environment = self.environment.snapshot();
        self.environment.replace(&baseline_env);
        loaded?;

        let context = Arc::new(ExecutionContext::new(config, environment));
        self.active.store(Arc::clone(&context));

        if state.generation == generation {
            state.entries.insert(payload.id(), Arc::clone(&context));
            debug!(
                credential_file = %payload.credential_file().display(),
                "Execution context built"
            );
        } else {
            debug!("Execution context built for a superseded registry; not cached");
        }

        Ok(context)
    }

    /// Drop every cached context. Baselines are kept.
    pub async fn invalidate_all(&self) -> usize {
        self.invalidate_all_with(|| ()).await
    }

    /// Run `swap` and drop every cached context as one step under the cache lock.
    pub async fn invalidate_all_with<F: FnOnce()>(&self, swap: F) -> usize {
        let mut state = self.state.lock().await;
        swap();
        let cleared = state.entries.len();
        state.entries.clear();
        state.generation += 1;
        cleared
    }
}
