//! knife-dns: a loopback DNS resolver mapping `<role>[-n].<domain>.<zone>`
//! names to inventory node addresses.
pub mod app;
pub mod bootstrap;

pub use app::ResolverServer;
