use std::fmt;

/// One tagged line of ingested text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// Sender identity: reverse-DNS name or the literal address. Never empty.
    pub tag: String,
    pub payload: String,
}

impl LogMessage {
    pub fn new(tag: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            payload: payload.into(),
        }
    }
}

/// Which listener produced a [`LogMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrigin {
    Udp,
    Tcp,
}

impl fmt::Display for LogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOrigin::Udp => f.write_str("udp"),
            LogOrigin::Tcp => f.write_str("tcp"),
        }
    }
}

#[derive(Debug)]
pub enum RelayEvent {
    /// Raw line read from the IRC server
    IrcLine(String),

    /// Log line received by one of the listeners
    Log {
        origin: LogOrigin,
        message: LogMessage,
    },
}
