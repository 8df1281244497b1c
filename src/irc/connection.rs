use crate::app::action::OutgoingCommand;
use crate::app::state::ConnectionState;
use crate::app::QUEUE_CAPACITY;
use crate::irc::codec::{LineCodec, LineCodecError};
use futures::{SinkExt, StreamExt};
use std::io;
use thiserror::Error;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

/// Longest line accepted from the IRC server, excluding the terminator.
pub const MAX_LINE_LENGTH: usize = 8191;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("read from IRC server failed: {0}")]
    Read(#[source] LineCodecError),
    #[error("write to IRC server failed: {0}")]
    Write(#[source] LineCodecError),
    #[error("IRC server closed the connection")]
    Closed,
    #[error("outgoing command queue is closed")]
    QueueClosed,
}

/// Producer side of the bounded outgoing-command queue.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    tx: mpsc::Sender<OutgoingCommand>,
}

impl CommandQueue {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutgoingCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue a command for the writer task, waiting while the queue is full.
    pub async fn send(&self, command: OutgoingCommand) -> Result<(), ConnectionError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ConnectionError::QueueClosed)
    }
}

/// The running IRC session.
///
/// `reader` and `writer` finish only when the session is lost; either one
/// finishing is fatal for the relay.
pub struct IrcConnection {
    pub incoming: mpsc::Receiver<String>,
    pub queue: CommandQueue,
    pub reader: JoinHandle<Result<(), ConnectionError>>,
    pub writer: JoinHandle<Result<(), ConnectionError>>,
}

/// Connect to the IRC server, queue `NICK`/`USER` registration, and spawn
/// the reader and writer tasks.
pub async fn connect(state: &ConnectionState) -> Result<IrcConnection, ConnectionError> {
    let addr = state.address();
    info!(%addr, "connecting to IRC server");

    let stream = TcpStream::connect((state.host.as_str(), state.port))
        .await
        .map_err(|source| ConnectionError::Connect {
            addr: addr.clone(),
            source,
        })?;
    if let Err(e) = stream.set_nodelay(true) {
        debug!(error = %e, "could not set TCP_NODELAY");
    }
    info!(%addr, "connected to IRC server");

    let (queue, outgoing) = CommandQueue::channel(QUEUE_CAPACITY);
    queue.send(OutgoingCommand::nick(&state.nick)).await?;
    queue.send(OutgoingCommand::user(&state.nick)).await?;

    let (read_half, write_half) = stream.into_split();
    let (incoming_tx, incoming) = mpsc::channel(QUEUE_CAPACITY);

    let writer = tokio::spawn(write_commands(
        FramedWrite::new(write_half, LineCodec::new(MAX_LINE_LENGTH)),
        outgoing,
    ));
    let reader = tokio::spawn(read_lines(
        FramedRead::new(read_half, LineCodec::new(MAX_LINE_LENGTH)),
        incoming_tx,
    ));

    Ok(IrcConnection {
        incoming,
        queue,
        reader,
        writer,
    })
}

async fn read_lines(
    mut lines: FramedRead<OwnedReadHalf, LineCodec>,
    incoming: mpsc::Sender<String>,
) -> Result<(), ConnectionError> {
    debug!("irc reader starting");
    while let Some(line) = lines.next().await {
        let line = line.map_err(ConnectionError::Read)?;
        if incoming.send(line).await.is_err() {
            debug!("dispatcher gone, irc reader stopping");
            return Ok(());
        }
    }
    Err(ConnectionError::Closed)
}

/// The only code that writes to the IRC transport.
async fn write_commands(
    mut sink: FramedWrite<OwnedWriteHalf, LineCodec>,
    mut outgoing: mpsc::Receiver<OutgoingCommand>,
) -> Result<(), ConnectionError> {
    debug!("irc writer starting");
    while let Some(command) = outgoing.recv().await {
        let line = match command.render() {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "dropping malformed outgoing command");
                continue;
            }
        };
        debug!("outgoing >>> {}", line);
        sink.send(line).await.map_err(ConnectionError::Write)?;
    }
    debug!("irc writer complete");
    Ok(())
}
