use std::collections::BTreeMap;
use std::fmt;

/// Environment variables captured at a point in time.
pub type EnvSnapshot = BTreeMap<String, String>;

/// A single knife setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Str(String),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Str(s) => f.write_str(s),
        }
    }
}

/// Knife-style configuration: flat key → value settings such as
/// `chef_server_url` and `node_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnifeConfig {
    settings: BTreeMap<String, ConfigValue>,
}

impl KnifeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.settings.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.settings.remove(key)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.settings.iter()
    }
}

/// Everything an inventory lookup needs for one domain: the loaded knife
/// configuration and the environment that was active while loading it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub config: KnifeConfig,
    pub environment: EnvSnapshot,
}

impl ExecutionContext {
    pub fn new(config: KnifeConfig, environment: EnvSnapshot) -> Self {
        Self {
            config,
            environment,
        }
    }

    pub fn setting(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key)
    }
}
