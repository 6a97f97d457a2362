use futures::FutureExt;
use hickory_proto::op::Message;
use hickory_proto::rr::{DNSClass, Name, RecordType};
use knife_dns_application::use_cases::ResolveHostnameUseCase;
use knife_dns_domain::{DomainError, DomainName};
use std::net::Ipv4Addr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::ResponseBuilder;

/// Answers decoded requests: one resolution per IN/A question.
///
/// A question that fails, or even panics, only loses its own answer.
pub struct QueryHandler {
    resolver: Arc<ResolveHostnameUseCase>,
}

impl QueryHandler {
    pub fn new(resolver: Arc<ResolveHostnameUseCase>) -> Self {
        Self { resolver }
    }

    /// Decode a request datagram and produce the encoded reply.
    pub async fn handle(&self, datagram: &[u8]) -> Result<Vec<u8>, DomainError> {
        let request = Message::from_vec(datagram).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse DNS request: {}", e))
        })?;

        let response = self.answer(&request).await;
        ResponseBuilder::encode(&response)
    }

    pub async fn answer(&self, request: &Message) -> Message {
        let mut builder = ResponseBuilder::for_request(request);

        for query in request.queries() {
            if query.query_type() != RecordType::A || query.query_class() != DNSClass::IN {
                debug!(
                    name = %query.name(),
                    record_type = %query.query_type(),
                    "Ignoring non-address question"
                );
                continue;
            }

            if let Some(address) = self.resolve(query.name()).await {
                builder.add_address(query.name(), address);
            }
        }

        builder.finish()
    }

    async fn resolve(&self, name: &Name) -> Option<Ipv4Addr> {
        let domain = match DomainName::parse(&name.to_utf8()) {
            Ok(domain) => domain,
            Err(e) => {
                warn!(name = %name, error = %e, "Unparseable question name");
                return None;
            }
        };

        match AssertUnwindSafe(self.resolver.execute(&domain))
            .catch_unwind()
            .await
        {
            Ok(Ok(address)) => address,
            Ok(Err(e)) => {
                warn!(name = %domain, error = %e, "Resolution failed");
                None
            }
            Err(_) => {
                error!(name = %domain, "Resolution panicked");
                None
            }
        }
    }
}
