//! knife-dns domain layer
pub mod config;
pub mod dns_name;
pub mod errors;
pub mod execution_context;
pub mod node;
pub mod registry;
pub mod role_query;

pub use config::{
    ConfigError, ConfigSource, DomainSettings, DomainsConfig, LoggingConfig, ServerConfig,
};
pub use dns_name::DomainName;
pub use errors::DomainError;
pub use execution_context::{ConfigValue, EnvSnapshot, ExecutionContext, KnifeConfig};
pub use node::{CloudAttributes, NodeRecord};
pub use registry::{DomainEntry, DomainPayload, DomainRegistry, PayloadId};
pub use role_query::RoleQuery;
