use crate::app::event::LogMessage;
use crate::ingest::tag::TagResolver;
use crate::ingest::IngestError;
use crate::irc::codec::LineCodec;
use futures::StreamExt;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

/// Longest accepted log line. A longer line closes that connection.
pub const MAX_LINE_LENGTH: usize = 8192;

/// One message per newline-delimited line, one task per connection.
pub struct TcpLogListener {
    listener: TcpListener,
    resolver: TagResolver,
}

impl TcpLogListener {
    pub async fn bind(addr: SocketAddr, resolver: TagResolver) -> Result<Self, IngestError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| IngestError::Bind {
                transport: "tcp",
                addr,
                source,
            })?;
        debug!(%addr, "tcp listener bound");
        Ok(Self { listener, resolver })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the dispatcher goes away.
    pub async fn run(self, out: mpsc::Sender<LogMessage>) {
        loop {
            let (stream, remote) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            if out.is_closed() {
                debug!("dispatcher gone, tcp listener stopping");
                return;
            }

            let resolver = self.resolver;
            let out = out.clone();
            tokio::spawn(async move {
                match read_connection(stream, remote, resolver, out).await {
                    Ok(()) => debug!(%remote, "closing reader"),
                    Err(e) => warn!(%remote, error = %e, "closing log connection"),
                }
            });
        }
    }
}

async fn read_connection(
    stream: TcpStream,
    remote: SocketAddr,
    resolver: TagResolver,
    out: mpsc::Sender<LogMessage>,
) -> Result<(), IngestError> {
    let tag = resolver.resolve(remote.ip()).await;
    debug!(%remote, %tag, "log connection accepted");

    let mut lines = FramedRead::new(stream, LineCodec::new(MAX_LINE_LENGTH));
    while let Some(line) = lines.next().await {
        let payload = line.map_err(IngestError::Read)?;
        if out.send(LogMessage::new(tag.as_str(), payload)).await.is_err() {
            break;
        }
    }
    Ok(())
}
