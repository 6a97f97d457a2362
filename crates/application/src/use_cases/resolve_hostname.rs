use knife_dns_domain::{DomainError, DomainName, RoleQuery};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ports::{InventorySearch, NODE_INDEX};
use crate::services::DomainDirectory;

/// Turns `<role>[-<n>].<domain>.<zone>` into the address of the n-th node
/// carrying that role in the domain's inventory.
pub struct ResolveHostnameUseCase {
    directory: Arc<DomainDirectory>,
    inventory: Arc<dyn InventorySearch>,
}

impl ResolveHostnameUseCase {
    pub fn new(directory: Arc<DomainDirectory>, inventory: Arc<dyn InventorySearch>) -> Self {
        Self {
            directory,
            inventory,
        }
    }

    /// `Ok(None)` when the name matches no domain or no node; `Err` when the
    /// credential file or the inventory failed.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn execute(&self, name: &DomainName) -> Result<Option<Ipv4Addr>, DomainError> {
        debug!("Resolving");

        let snapshot = self.directory.snapshot().await;
        let Some(entry) = snapshot.registry.lookup(name) else {
            debug!("No configured domain matches");
            return Ok(None);
        };
        let Some(label) = name.first_label() else {
            return Ok(None);
        };

        let query = RoleQuery::parse(label);
        let payload = Arc::clone(&entry.payload);
        let context = self.directory.context_for(&snapshot, &payload).await?;

        let expression = query.search_expression(payload.search_extra());
        debug!(
            domain = payload.name(),
            role = %query.role,
            index = query.index,
            "Looking up role"
        );

        let nodes = self
            .inventory
            .search(&context, NODE_INDEX, &expression)
            .await?;

        let Some(node) = nodes.get(query.index) else {
            debug!(
                index = query.index,
                nodes = nodes.len(),
                "Index beyond bounds"
            );
            return Ok(None);
        };

        let address = node.ipv4()?;
        info!(node = node.display_name(), address = %address, "Found node");
        Ok(Some(address))
    }
}
