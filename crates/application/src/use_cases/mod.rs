pub mod config;
pub mod resolve_hostname;

// Re-export use cases
pub use config::ReloadConfigUseCase;
pub use resolve_hostname::ResolveHostnameUseCase;
