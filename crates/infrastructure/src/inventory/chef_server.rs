use async_trait::async_trait;
use knife_dns_application::ports::InventorySearch;
use knife_dns_domain::{CloudAttributes, DomainError, ExecutionContext, NodeRecord};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Inventory search over the Chef server search API.
///
/// The server is taken from the context's `chef_server_url` setting and the
/// client identity from `node_name`. Requests are not signed.
pub struct ChefServerInventory {
    client: reqwest::Client,
}

impl ChefServerInventory {
    pub fn new() -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("knife-dns/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Inventory(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn search_url(server_url: &str, kind: &str, expression: &str) -> Result<Url, DomainError> {
        let base = format!("{}/search/{}", server_url.trim_end_matches('/'), kind);
        let mut url = Url::parse(&base)
            .map_err(|e| DomainError::Inventory(format!("invalid chef_server_url '{}': {}", server_url, e)))?;
        url.query_pairs_mut().append_pair("q", expression);
        Ok(url)
    }

    /// Parse a search response body (`{"rows": [...]}`).
    pub fn parse_rows(body: &[u8]) -> Result<Vec<NodeRecord>, DomainError> {
        let document: Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::Inventory(format!("invalid search response: {}", e)))?;

        let rows = document
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| DomainError::Inventory("search response has no rows".to_string()))?;

        Ok(rows.iter().map(node_from_row).collect())
    }
}

/// Rows are either full node objects (attributes under `automatic`), partial
/// search results (under `data`) or flat attribute maps.
fn node_from_row(row: &Value) -> NodeRecord {
    let name = attribute(row, &["name"]).or_else(|| attribute(row, &["fqdn"]));
    let ipaddress = attribute(row, &["ipaddress"]);
    let ec2 = row_sections(row)
        .find_map(|section| section.get("ec2").filter(|v| v.is_object()))
        .map(|ec2| CloudAttributes {
            public_ipv4: ec2
                .get("public_ipv4")
                .and_then(Value::as_str)
                .map(str::to_string),
        });

    NodeRecord {
        name,
        ipaddress,
        ec2,
    }
}

fn row_sections(row: &Value) -> impl Iterator<Item = &Value> {
    [Some(row), row.get("data"), row.get("automatic")]
        .into_iter()
        .flatten()
}

fn attribute(row: &Value, path: &[&str]) -> Option<String> {
    row_sections(row).find_map(|section| {
        path.iter()
            .try_fold(section, |value, key| value.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

#[async_trait]
impl InventorySearch for ChefServerInventory {
    async fn search(
        &self,
        context: &ExecutionContext,
        kind: &str,
        expression: &str,
    ) -> Result<Vec<NodeRecord>, DomainError> {
        let server_url = context
            .config
            .get_str("chef_server_url")
            .ok_or_else(|| DomainError::Inventory("chef_server_url is not set".to_string()))?;
        let url = Self::search_url(server_url, kind, expression)?;

        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(node_name) = context.config.get_str("node_name") {
            request = request.header("X-Ops-UserId", node_name);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Inventory(format!("{}: {}", url, e)))?
            .error_for_status()
            .map_err(|e| DomainError::Inventory(format!("{}: {}", url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Inventory(format!("{}: {}", url, e)))?;

        let nodes = Self::parse_rows(&body)?;
        debug!(url = %url, nodes = nodes.len(), "Inventory search completed");
        Ok(nodes)
    }
}
