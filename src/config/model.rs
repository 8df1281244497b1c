//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default so a missing file or section still loads.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use super::nickname::generate_nickname;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub irc: IrcConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The IRC server and channel to relay into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrcConfig {
    /// Hostname or IP address of the IRC server.
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_irc_port")]
    pub port: u16,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    #[serde(default)]
    pub channel: String,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_irc_port(),
            nickname: default_nickname(),
            channel: String::new(),
        }
    }
}

/// Which listeners accept log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Both,
    Udp,
    Tcp,
}

impl TransportMode {
    pub fn udp(self) -> bool {
        matches!(self, TransportMode::Both | TransportMode::Udp)
    }

    pub fn tcp(self) -> bool {
        matches!(self, TransportMode::Both | TransportMode::Tcp)
    }
}

/// Log ingestion listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// Shared by the UDP and TCP listeners.
    #[serde(default = "default_ingest_port")]
    pub port: u16,
    #[serde(default)]
    pub mode: TransportMode,
    /// Tag senders by reverse-DNS name instead of address.
    #[serde(default = "default_true")]
    pub resolve_hostnames: bool,
}

impl IngestConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_ingest_port(),
            mode: TransportMode::default(),
            resolve_hostnames: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process log output. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_nickname() -> String {
    generate_nickname()
}
fn default_irc_port() -> u16 {
    6667
}
fn default_ingest_port() -> u16 {
    5222
}
fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
