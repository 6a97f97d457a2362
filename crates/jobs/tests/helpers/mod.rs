#![allow(dead_code)]

use async_trait::async_trait;
use knife_dns_application::ports::{CredentialLoader, EnvironmentStore, InventorySearch};
use knife_dns_domain::{DomainError, EnvSnapshot, ExecutionContext, KnifeConfig, NodeRecord};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Accepts any credential file and counts loads.
#[derive(Default)]
pub struct CountingLoader {
    loads: AtomicU64,
}

impl CountingLoader {
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::SeqCst)
    }
}

impl CredentialLoader for CountingLoader {
    fn load(
        &self,
        _path: &Path,
        _config: &mut KnifeConfig,
        _environment: &dyn EnvironmentStore,
    ) -> Result<(), DomainError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Blocks the calling thread for `delay` on every load, keeping the
/// context cache locked for that long.
pub struct SlowLoader {
    pub delay: Duration,
}

impl CredentialLoader for SlowLoader {
    fn load(
        &self,
        _path: &Path,
        _config: &mut KnifeConfig,
        _environment: &dyn EnvironmentStore,
    ) -> Result<(), DomainError> {
        std::thread::sleep(self.delay);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockEnvironment {
    vars: Mutex<EnvSnapshot>,
}

impl EnvironmentStore for MockEnvironment {
    fn snapshot(&self) -> EnvSnapshot {
        self.vars.lock().unwrap().clone()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn replace(&self, snapshot: &EnvSnapshot) {
        *self.vars.lock().unwrap() = snapshot.clone();
    }
}

/// Every role resolves to one node at 10.0.0.1.
pub struct SingleNodeInventory;

#[async_trait]
impl InventorySearch for SingleNodeInventory {
    async fn search(
        &self,
        _context: &ExecutionContext,
        _kind: &str,
        _expression: &str,
    ) -> Result<Vec<NodeRecord>, DomainError> {
        Ok(vec![NodeRecord::new("10.0.0.1")])
    }
}
