use crate::config::IrcConfig;

/// Identity of the single IRC session, shared read-only by every task.
///
/// The transport itself is owned by the IRC connection's writer and reader
/// tasks, never by this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    pub host: String,
    pub port: u16,
    pub nick: String,
    pub channel: String,
}

impl ConnectionState {
    pub fn from_config(config: &IrcConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            nick: config.nickname.clone(),
            channel: config.channel.clone(),
        }
    }

    /// `host:port` as dialled.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
