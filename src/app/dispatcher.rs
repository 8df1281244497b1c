//! Central relay loop.
//!
//! Waits on incoming IRC lines and on log messages from both listeners,
//! handles one event at a time, and enqueues the resulting commands. Order
//! is preserved within a source; between sources it is whatever the runtime
//! yields first.

use crate::app::event::{LogMessage, LogOrigin, RelayEvent};
use crate::app::handler;
use crate::app::state::ConnectionState;
use crate::irc::connection::CommandQueue;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("IRC reader stopped delivering lines")]
    IrcClosed,
    #[error("IRC writer is gone")]
    WriterClosed,
}

/// Receivers the dispatcher multiplexes. A `None` listener is disabled.
pub struct EventSources {
    pub irc: mpsc::Receiver<String>,
    pub udp: Option<mpsc::Receiver<LogMessage>>,
    pub tcp: Option<mpsc::Receiver<LogMessage>>,
}

pub struct Dispatcher {
    state: Arc<ConnectionState>,
    queue: CommandQueue,
}

impl Dispatcher {
    pub fn new(state: Arc<ConnectionState>, queue: CommandQueue) -> Self {
        Self { state, queue }
    }

    /// Run until the IRC session or the writer goes away. Both are fatal, so
    /// this only ever returns an error.
    pub async fn run(self, mut sources: EventSources) -> Result<(), DispatchError> {
        info!(channel = %self.state.channel, "dispatcher running");
        loop {
            let udp_open = sources.udp.is_some();
            let tcp_open = sources.tcp.is_some();

            let event = tokio::select! {
                line = sources.irc.recv() => match line {
                    Some(line) => RelayEvent::IrcLine(line),
                    None => return Err(DispatchError::IrcClosed),
                },
                message = recv_log(&mut sources.udp), if udp_open => match message {
                    Some(message) => RelayEvent::Log { origin: LogOrigin::Udp, message },
                    None => {
                        warn!("udp listener stopped, no longer relaying udp logs");
                        sources.udp = None;
                        continue;
                    }
                },
                message = recv_log(&mut sources.tcp), if tcp_open => match message {
                    Some(message) => RelayEvent::Log { origin: LogOrigin::Tcp, message },
                    None => {
                        warn!("tcp listener stopped, no longer relaying tcp logs");
                        sources.tcp = None;
                        continue;
                    }
                },
            };

            self.dispatch(event).await?;
        }
    }

    async fn dispatch(&self, event: RelayEvent) -> Result<(), DispatchError> {
        for command in handler::handle_event(&self.state, event) {
            self.queue
                .send(command)
                .await
                .map_err(|_| DispatchError::WriterClosed)?;
        }
        Ok(())
    }
}

async fn recv_log(rx: &mut Option<mpsc::Receiver<LogMessage>>) -> Option<LogMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
