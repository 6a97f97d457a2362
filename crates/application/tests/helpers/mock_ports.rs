#![allow(dead_code)]

use async_trait::async_trait;
use knife_dns_application::ports::{CredentialLoader, EnvironmentStore, InventorySearch};
use knife_dns_domain::{
    ConfigValue, DomainError, EnvSnapshot, ExecutionContext, KnifeConfig, NodeRecord,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

// ============================================================================
// Mock InventorySearch
// ============================================================================

pub struct MockInventory {
    results: Arc<RwLock<HashMap<String, Vec<NodeRecord>>>>,
    calls: Arc<RwLock<Vec<(String, ExecutionContext)>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockInventory {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn stub(&self, expression: &str, nodes: Vec<NodeRecord>) {
        self.results
            .write()
            .await
            .insert(expression.to_string(), nodes);
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    pub async fn calls(&self) -> Vec<(String, ExecutionContext)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl InventorySearch for MockInventory {
    async fn search(
        &self,
        context: &ExecutionContext,
        kind: &str,
        expression: &str,
    ) -> Result<Vec<NodeRecord>, DomainError> {
        assert_eq!(kind, "node");
        self.calls
            .write()
            .await
            .push((expression.to_string(), context.clone()));
        if *self.should_fail.read().await {
            return Err(DomainError::Inventory("search unavailable".to_string()));
        }
        Ok(self
            .results
            .read()
            .await
            .get(expression)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn nodes(addresses: &[&str]) -> Vec<NodeRecord> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, a)| NodeRecord::new(*a).with_name(format!("node {}", i)))
        .collect()
}

// ============================================================================
// Mock EnvironmentStore
// ============================================================================

#[derive(Default)]
pub struct MockEnvironment {
    vars: Mutex<EnvSnapshot>,
}

impl MockEnvironment {
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let env = Self::default();
        for (k, v) in vars {
            env.set(k, v);
        }
        env
    }
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

// ============================================================================
// Mock CredentialLoader
// ============================================================================

#[derive(Clone)]
pub enum Setting {
    Value(ConfigValue),
    /// Copied from the named environment variable; removed when unset.
    Env(String),
}

/// In-memory credential files keyed by path.
#[derive(Default)]
pub struct MockCredentialLoader {
    files: Mutex<HashMap<PathBuf, Vec<(String, Setting)>>>,
    loads: AtomicU64,
}

impl MockCredentialLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, settings: Vec<(&str, Setting)>) -> Self {
        self.write_file(path, settings);
        self
    }

    pub fn write_file(&self, path: &str, settings: Vec<(&str, Setting)>) {
        self.files.lock().unwrap().insert(
            PathBuf::from(path),
            settings
                .into_iter()
                .map(|(k, s)| (k.to_string(), s))
                .collect(),
        );
    }

    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::SeqCst)
    }
}

impl CredentialLoader for MockCredentialLoader {
    fn load(
        &self,
        path: &Path,
        config: &mut KnifeConfig,
        environment: &dyn EnvironmentStore,
    ) -> Result<(), DomainError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        let settings = files
            .get(path)
            .ok_or_else(|| DomainError::CredentialLoad(path.display().to_string()))?;

        for (key, setting) in settings {
            match setting {
                Setting::Value(value) => config.set(key.clone(), value.clone()),
                Setting::Env(var) => match environment.get(var) {
                    Some(value) => config.set(key.clone(), ConfigValue::Str(value)),
                    None => {
                        config.remove(key);
                    }
                },
            }
        }
        Ok(())
    }
}

pub fn value(s: &str) -> Setting {
    Setting::Value(ConfigValue::Str(s.to_string()))
}

pub fn flag(b: bool) -> Setting {
    Setting::Value(ConfigValue::Bool(b))
}

pub fn from_env(var: &str) -> Setting {
    Setting::Env(var.to_string())
}
