use knife_dns_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::QueryHandler;

/// Largest request datagram accepted.
const MAX_UDP_REQUEST_SIZE: usize = 4096;

/// UDP listener that answers one datagram at a time.
///
/// The loop ends when the cancellation token fires, abandoning any pending
/// receive or resolution; the socket is closed when `run` returns.
pub struct DnsQueryServer {
    socket: UdpSocket,
    handler: Arc<QueryHandler>,
    shutdown: CancellationToken,
}

impl DnsQueryServer {
    pub async fn bind(addr: SocketAddr, handler: Arc<QueryHandler>) -> Result<Self, DomainError> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            DomainError::IoError(format!("Failed to bind UDP socket on {}: {}", addr, e))
        })?;

        Ok(Self {
            socket,
            handler,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    pub async fn run(self) {
        let local_addr = self.local_addr().ok();
        info!(bind_address = ?local_addr, protocol = "UDP", "DNS server listening");

        let mut buf = vec![0u8; MAX_UDP_REQUEST_SIZE];
        loop {
            let (len, peer) = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "UDP receive failed");
                        continue;
                    }
                },
            };

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = self.respond(&buf[..len], peer) => {}
            }
        }

        info!(bind_address = ?local_addr, "DNS server stopped");
    }

    async fn respond(&self, datagram: &[u8], peer: SocketAddr) {
        let reply = match self.handler.handle(datagram).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(peer = %peer, error = %e, "Dropping request");
                return;
            }
        };

        match self.socket.send_to(&reply, peer).await {
            Ok(bytes_sent) => debug!(peer = %peer, bytes_sent, "DNS response sent"),
            Err(e) => warn!(peer = %peer, error = %e, "Failed to send DNS response"),
        }
    }
}
