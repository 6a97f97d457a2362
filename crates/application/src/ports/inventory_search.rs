use async_trait::async_trait;
use knife_dns_domain::{DomainError, ExecutionContext, NodeRecord};

/// Search index holding node records.
pub const NODE_INDEX: &str = "node";

/// The node inventory, queried under a domain's execution context.
#[async_trait]
pub trait InventorySearch: Send + Sync {
    /// Ordered search results for `expression` in index `kind`.
    async fn search(
        &self,
        context: &ExecutionContext,
        kind: &str,
        expression: &str,
    ) -> Result<Vec<NodeRecord>, DomainError>;
}
