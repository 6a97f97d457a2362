pub mod context_cache;
pub mod domain_directory;

pub use context_cache::ContextCache;
pub use domain_directory::DomainDirectory;
