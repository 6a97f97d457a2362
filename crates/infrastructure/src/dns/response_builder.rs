//! DNS Response Builder
//!
//! Assembles authoritative answers for a decoded request using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use knife_dns_domain::config::ANSWER_TTL;
use knife_dns_domain::DomainError;
use std::net::Ipv4Addr;

/// Builds the reply to one request.
///
/// The reply copies the request id, opcode, recursion-desired flag and
/// question section, and is always authoritative.
pub struct ResponseBuilder {
    message: Message,
}

impl ResponseBuilder {
    pub fn for_request(request: &Message) -> Self {
        let mut message = Message::new(request.id(), MessageType::Response, request.op_code());
        message.set_authoritative(true);
        message.set_recursion_desired(request.recursion_desired());
        for query in request.queries() {
            message.add_query(query.clone());
        }
        Self { message }
    }

    /// Append an A record for `name` with the fixed answer TTL.
    pub fn add_address(&mut self, name: &Name, address: Ipv4Addr) -> &mut Self {
        let mut owner = name.clone();
        owner.set_fqdn(true);
        self.message
            .add_answer(Record::from_rdata(owner, ANSWER_TTL, RData::A(A(address))));
        self
    }

    /// NXDOMAIN when nothing was answered, NOERROR otherwise.
    pub fn finish(mut self) -> Message {
        let code = if self.message.answers().is_empty() {
            ResponseCode::NXDomain
        } else {
            ResponseCode::NoError
        };
        self.message.set_response_code(code);
        self.message
    }

    /// Serialize a Message to wire format bytes
    pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
