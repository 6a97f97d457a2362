use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::DomainName;

/// Settings for one configured domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainSettings {
    /// Knife-style file holding the inventory connection details.
    pub credential_file: PathBuf,

    /// Environment variables applied while the credential file is loaded.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Extra search fragment AND-ed with the role filter.
    #[serde(default)]
    pub search_extra: Option<String>,
}

impl DomainSettings {
    pub fn new(credential_file: impl Into<PathBuf>) -> Self {
        Self {
            credential_file: credential_file.into(),
            env: BTreeMap::new(),
            search_extra: None,
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_search_extra(mut self, extra: impl Into<String>) -> Self {
        self.search_extra = Some(extra.into());
        self
    }
}

/// Domain name → settings, as read from the domains file.
///
/// ```yaml
/// production:
///   credential_file: /etc/chef/production/knife.rb
/// staging:
///   credential_file: /etc/chef/staging/knife.rb
///   env:
///     CHEF_ENV: staging
///   search_extra: "chef_environment:staging"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DomainsConfig {
    domains: BTreeMap<String, DomainSettings>,
}

impl DomainsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, name: impl Into<String>, settings: DomainSettings) -> Self {
        self.domains.insert(name.into(), settings);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, settings: DomainSettings) {
        self.domains.insert(name.into(), settings);
    }

    pub fn get(&self, name: &str) -> Option<&DomainSettings> {
        self.domains.get(name)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DomainSettings)> {
        self.domains.iter()
    }

    /// Load a domains file. `.toml` files are parsed as TOML, anything else as YAML.
    ///
    /// Relative credential paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut config = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        if let Some(base_dir) = path.parent() {
            config.resolve_relative_paths(base_dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::Validation(
                "at least one domain must be configured".to_string(),
            ));
        }

        let mut seen: Vec<(&str, DomainName)> = Vec::with_capacity(self.domains.len());
        for (name, settings) in &self.domains {
            let parsed = DomainName::parse(name).map_err(|e| {
                ConfigError::Validation(format!("domain '{}': {}", name, e))
            })?;
            if parsed.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "domain '{}' has no labels",
                    name
                )));
            }
            // Suffixes compare case-insensitively.
            if let Some((other, _)) = seen.iter().find(|(_, existing)| *existing == parsed) {
                return Err(ConfigError::Validation(format!(
                    "domains '{}' and '{}' name the same suffix",
                    other, name
                )));
            }
            if settings.credential_file.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "domain '{}' has an empty credential_file",
                    name
                )));
            }
            for (key, value) in &settings.env {
                if key.is_empty() || key.contains('=') || key.contains('\0') || value.contains('\0')
                {
                    return Err(ConfigError::Validation(format!(
                        "domain '{}' has an invalid env entry '{}'",
                        name, key
                    )));
                }
            }
            seen.push((name.as_str(), parsed));
        }

        Ok(())
    }

    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        for settings in self.domains.values_mut() {
            if settings.credential_file.is_relative() {
                settings.credential_file = base_dir.join(&settings.credential_file);
            }
        }
    }
}

/// Where the domains come from: an in-memory map, or a file that may be watched.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Inline(DomainsConfig),
    File(PathBuf),
}

impl ConfigSource {
    pub fn load(&self) -> Result<DomainsConfig, ConfigError> {
        match self {
            ConfigSource::Inline(config) => {
                config.validate()?;
                Ok(config.clone())
            }
            ConfigSource::File(path) => DomainsConfig::load(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Inline(_) => None,
            ConfigSource::File(path) => Some(path),
        }
    }
}

impl From<DomainsConfig> for ConfigSource {
    fn from(config: DomainsConfig) -> Self {
        ConfigSource::Inline(config)
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::File(path)
    }
}
