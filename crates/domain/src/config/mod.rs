//! Configuration module for knife-dns
//!
//! This module contains all configuration structures organized by concern:
//! - `domains`: domain name → credential settings served by the resolver
//! - `server`: listener port, base zone and watch settings
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod domains;
pub mod errors;
pub mod logging;
pub mod server;

pub use domains::{ConfigSource, DomainSettings, DomainsConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use server::{ServerConfig, ANSWER_TTL};
