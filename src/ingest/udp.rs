use crate::app::event::LogMessage;
use crate::ingest::tag::TagResolver;
use crate::ingest::{decode_payload, IngestError};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::debug;

/// Receive buffer size. Longer datagrams are truncated to this many bytes.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// One message per datagram.
pub struct UdpLogListener {
    socket: UdpSocket,
    resolver: TagResolver,
}

impl UdpLogListener {
    pub async fn bind(addr: SocketAddr, resolver: TagResolver) -> Result<Self, IngestError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| IngestError::Bind {
                transport: "udp",
                addr,
                source,
            })?;
        debug!(%addr, "udp listener bound");
        Ok(Self { socket, resolver })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive datagrams until a socket error, resolving and enqueueing each
    /// one inline so per-sender order is kept.
    pub async fn run(self, out: mpsc::Sender<LogMessage>) -> Result<(), IngestError> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            let (n, remote) = self
                .socket
                .recv_from(&mut buf)
                .await
                .map_err(IngestError::Receive)?;
            let payload = decode_payload(&buf[..n]);
            debug!("payload of {} bytes from {}: {}", n, remote, payload);

            let tag = self.resolver.resolve(remote.ip()).await;
            if out.send(LogMessage::new(tag, payload)).await.is_err() {
                debug!("dispatcher gone, udp listener stopping");
                return Ok(());
            }
        }
    }
}
