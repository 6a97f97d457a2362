use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{DomainError, DomainName, DomainSettings, DomainsConfig};

static NEXT_PAYLOAD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`DomainPayload`] instance.
///
/// Every constructed payload gets a fresh id, so two payloads with equal
/// settings are still different cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadId(u64);

impl PayloadId {
    fn next() -> Self {
        Self(NEXT_PAYLOAD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Settings of one configured domain, shared by reference.
///
/// Deliberately not `Clone`: share it through `Arc` to keep its identity.
#[derive(Debug)]
pub struct DomainPayload {
    id: PayloadId,
    name: String,
    settings: DomainSettings,
}

impl DomainPayload {
    pub fn new(name: impl Into<String>, settings: DomainSettings) -> Self {
        Self {
            id: PayloadId::next(),
            name: name.into(),
            settings,
        }
    }

    pub fn id(&self) -> PayloadId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &DomainSettings {
        &self.settings
    }

    pub fn credential_file(&self) -> &std::path::Path {
        &self.settings.credential_file
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.settings.env
    }

    pub fn search_extra(&self) -> Option<&str> {
        self.settings.search_extra.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct DomainEntry {
    pub suffix: DomainName,
    pub payload: Arc<DomainPayload>,
}

/// Immutable suffix → payload table. Rebuilt from scratch on every reload.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    base_zone: DomainName,
    entries: Vec<DomainEntry>,
}

impl DomainRegistry {
    pub fn empty(base_zone: DomainName) -> Self {
        Self {
            base_zone,
            entries: Vec::new(),
        }
    }

    /// Build a registry where domain `d` matches `<d>.<base_zone>`.
    ///
    /// With exactly one domain the bare `<base_zone>` also matches, sharing
    /// the same payload instance.
    pub fn build(config: &DomainsConfig, base_zone: &DomainName) -> Result<Self, DomainError> {
        let mut entries = Vec::with_capacity(config.len() + 1);

        for (name, settings) in config.iter() {
            let suffix = DomainName::parse(name)?.join(base_zone);
            let payload = Arc::new(DomainPayload::new(name.clone(), settings.clone()));
            entries.push(DomainEntry { suffix, payload });
        }

        if entries.len() == 1 {
            let payload = Arc::clone(&entries[0].payload);
            entries.push(DomainEntry {
                suffix: base_zone.clone(),
                payload,
            });
        }

        Ok(Self {
            base_zone: base_zone.clone(),
            entries,
        })
    }

    /// First entry whose suffix sits exactly one label above `name`.
    pub fn lookup(&self, name: &DomainName) -> Option<&DomainEntry> {
        self.entries.iter().find(|entry| name.is_child_of(&entry.suffix))
    }

    pub fn base_zone(&self) -> &DomainName {
        &self.base_zone
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_payload(&self, id: PayloadId) -> bool {
        self.entries.iter().any(|entry| entry.payload.id() == id)
    }

    /// Credential files referenced by the registry, each listed once.
    pub fn credential_files(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.payload.credential_file().to_path_buf())
            .filter(|path| seen.insert(path.clone()))
            .collect()
    }
}
