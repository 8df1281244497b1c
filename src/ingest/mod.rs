//! Log ingestion: UDP and TCP listeners that turn received text into
//! tagged [`LogMessage`](crate::app::event::LogMessage)s.

pub mod tag;
pub mod tcp;
pub mod udp;

use crate::irc::codec::LineCodecError;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to bind {transport} listener on {addr}: {source}")]
    Bind {
        transport: &'static str,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("udp receive failed: {0}")]
    Receive(#[source] io::Error),
    #[error("log connection read failed: {0}")]
    Read(#[source] LineCodecError),
}

/// Decode a datagram payload, dropping any trailing line terminators.
pub fn decode_payload(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
