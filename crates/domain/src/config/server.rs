use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::ConfigError;
use crate::DomainName;

/// TTL (seconds) attached to every answer record.
pub const ANSWER_TTL: u32 = 60;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// UDP port on the loopback interface. `0` asks the OS for a free port.
    pub port: u16,

    /// Zone every resolvable name ends with (e.g. `chef`).
    #[serde(default = "default_base_zone")]
    pub base_zone: String,

    /// Reload domains when the config file or a credential file changes.
    #[serde(default)]
    pub watch: bool,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_base_zone() -> String {
    "chef".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 53,
            base_zone: default_base_zone(),
            watch: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_base_zone(mut self, base_zone: impl Into<String>) -> Self {
        self.base_zone = base_zone.into();
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// The listener is always bound to loopback.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn base_zone_name(&self) -> Result<DomainName, ConfigError> {
        let zone = DomainName::parse(&self.base_zone)
            .map_err(|e| ConfigError::Validation(format!("base zone: {}", e)))?;
        if zone.is_empty() {
            return Err(ConfigError::Validation(
                "base zone must have at least one label".to_string(),
            ));
        }
        Ok(zone)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_zone_name()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
