//! knife-dns application layer: ports, shared services and use cases.
pub mod ports;
pub mod services;
pub mod use_cases;
