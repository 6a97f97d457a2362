pub mod credential_loader;
pub mod environment;
pub mod inventory_search;

pub use credential_loader::CredentialLoader;
pub use environment::EnvironmentStore;
pub use inventory_search::{InventorySearch, NODE_INDEX};
