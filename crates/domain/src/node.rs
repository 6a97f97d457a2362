use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::DomainError;

/// Cloud provider attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CloudAttributes {
    #[serde(default)]
    pub public_ipv4: Option<String>,
}

/// One node returned by an inventory search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ipaddress: Option<String>,

    #[serde(default)]
    pub ec2: Option<CloudAttributes>,
}

impl NodeRecord {
    pub fn new(ipaddress: impl Into<String>) -> Self {
        Self {
            name: None,
            ipaddress: Some(ipaddress.into()),
            ec2: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_public_ipv4(mut self, address: impl Into<String>) -> Self {
        self.ec2 = Some(CloudAttributes {
            public_ipv4: Some(address.into()),
        });
        self
    }

    /// Cloud public address when present, otherwise the general address.
    pub fn preferred_address(&self) -> Option<&str> {
        self.ec2
            .as_ref()
            .and_then(|ec2| ec2.public_ipv4.as_deref())
            .or(self.ipaddress.as_deref())
    }

    pub fn ipv4(&self) -> Result<Ipv4Addr, DomainError> {
        let address = self.preferred_address().ok_or_else(|| {
            DomainError::InvalidIpAddress(format!(
                "node {} has no address",
                self.display_name()
            ))
        })?;

        address
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(address.to_string()))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
