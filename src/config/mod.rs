pub mod model;
mod nickname;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub use model::{AppConfig, IrcConfig, LogFormat, TransportMode};

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("irclog")
        .join("config.toml")
}

/// Load the configuration from `path`, or from [`config_path`] when `None`.
///
/// A missing default file yields the defaults; an explicitly named file must
/// exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };
    if !explicit && !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `host` or `host:port`
    pub host: Option<String>,
    pub irc_port: Option<u16>,
    pub nickname: Option<String>,
    pub channel: Option<String>,
    pub ingest_port: Option<u16>,
    pub mode: Option<TransportMode>,
    pub no_resolve: bool,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(addr) = overrides.host {
            let (host, port) = split_host_port(&addr);
            self.irc.host = host;
            if let Some(port) = port {
                self.irc.port = port;
            }
        }
        if let Some(port) = overrides.irc_port {
            self.irc.port = port;
        }
        if let Some(nick) = overrides.nickname {
            self.irc.nickname = nick;
        }
        if let Some(channel) = overrides.channel {
            self.irc.channel = channel;
        }
        if let Some(port) = overrides.ingest_port {
            self.ingest.port = port;
        }
        if let Some(mode) = overrides.mode {
            self.ingest.mode = mode;
        }
        if overrides.no_resolve {
            self.ingest.resolve_hostnames = false;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Check the values the relay cannot start without and normalize the
    /// channel name.
    pub fn validate(&mut self) -> Result<()> {
        if self.irc.host.trim().is_empty() {
            bail!("no IRC host configured (set [irc] host or pass --host)");
        }
        if self.irc.nickname.is_empty() || self.irc.nickname.contains(char::is_whitespace) {
            bail!("invalid IRC nickname {:?}", self.irc.nickname);
        }
        let channel = self.irc.channel.trim();
        if channel.is_empty() {
            bail!("no IRC channel configured (set [irc] channel or pass --channel)");
        }
        if channel.contains(char::is_whitespace) {
            bail!("invalid IRC channel {:?}", self.irc.channel);
        }
        self.irc.channel = normalize_channel(channel);
        Ok(())
    }
}

/// Prefix `#` unless the name already carries a channel sigil.
pub fn normalize_channel(channel: &str) -> String {
    if channel.starts_with('#') || channel.starts_with('&') {
        channel.to_string()
    } else {
        format!("#{}", channel)
    }
}

/// Split `host:port`. A bare host, or one whose suffix is not a port number,
/// is returned whole.
fn split_host_port(addr: &str) -> (String, Option<u16>) {
    if let Some((host, port)) = addr.rsplit_once(':') {
        if !host.contains(':') {
            if let Ok(port) = port.parse::<u16>() {
                return (host.to_string(), Some(port));
            }
        }
    }
    (addr.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn test_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.irc.port, 6667);
        assert!(cfg.irc.host.is_empty());
        assert!(cfg.irc.nickname.starts_with("logbot"));
        assert_eq!(cfg.ingest.port, 5222);
        assert_eq!(cfg.ingest.mode, TransportMode::Both);
        assert_eq!(cfg.ingest.bind_address, "0.0.0.0".parse::<IpAddr>().unwrap());
        assert!(cfg.ingest.resolve_hostnames);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_file() {
        let cfg = parse_config(
            r##"
            [irc]
            host = "irc.example.net"
            port = 6697
            nickname = "relay"
            channel = "#ops"

            [ingest]
            port = 9000
            mode = "udp"
            resolve_hostnames = false

            [logging]
            level = "debug"
            format = "json"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.irc.host, "irc.example.net");
        assert_eq!(cfg.irc.port, 6697);
        assert_eq!(cfg.irc.nickname, "relay");
        assert_eq!(cfg.irc.channel, "#ops");
        assert_eq!(cfg.ingest.port, 9000);
        assert_eq!(cfg.ingest.mode, TransportMode::Udp);
        assert!(!cfg.ingest.resolve_hostnames);
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(parse_config("[ingest]\nmode = \"sctp\"\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut cfg = parse_config("[irc]\nhost = \"a\"\nchannel = \"#a\"\n").unwrap();
        cfg.apply(Overrides {
            host: Some("irc.example.net:7000".into()),
            nickname: Some("relay".into()),
            channel: Some("ops".into()),
            ingest_port: Some(6000),
            mode: Some(TransportMode::Tcp),
            no_resolve: true,
            ..Overrides::default()
        });
        assert_eq!(cfg.irc.host, "irc.example.net");
        assert_eq!(cfg.irc.port, 7000);
        assert_eq!(cfg.irc.nickname, "relay");
        assert_eq!(cfg.ingest.port, 6000);
        assert_eq!(cfg.ingest.mode, TransportMode::Tcp);
        assert!(!cfg.ingest.resolve_hostnames);

        cfg.validate().unwrap();
        assert_eq!(cfg.irc.channel, "#ops");
    }

    #[test]
    fn test_explicit_irc_port_beats_inline_port() {
        let mut cfg = AppConfig::default();
        cfg.apply(Overrides {
            host: Some("irc.example.net:7000".into()),
            irc_port: Some(6697),
            ..Overrides::default()
        });
        assert_eq!(cfg.irc.port, 6697);
    }

    #[test]
    fn test_validate_rejects_missing_values() {
        let mut cfg = AppConfig::default();
        cfg.irc.channel = "#logs".into();
        assert!(cfg.validate().is_err());

        cfg.irc.host = "irc.example.net".into();
        cfg.irc.channel = String::new();
        assert!(cfg.validate().is_err());

        cfg.irc.channel = "#logs".into();
        cfg.irc.nickname = "two words".into();
        assert!(cfg.validate().is_err());

        cfg.irc.nickname = "logbot".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_normalize_channel() {
        assert_eq!(normalize_channel("logs"), "#logs");
        assert_eq!(normalize_channel("#logs"), "#logs");
        assert_eq!(normalize_channel("&local"), "&local");
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("irc.example.net"), ("irc.example.net".into(), None));
        assert_eq!(split_host_port("irc.example.net:6697"), ("irc.example.net".into(), Some(6697)));
        assert_eq!(split_host_port("::1"), ("::1".into(), None));
        assert_eq!(split_host_port("host:abc"), ("host:abc".into(), None));
    }

    #[test]
    fn test_transport_mode_listeners() {
        assert!(TransportMode::Both.udp() && TransportMode::Both.tcp());
        assert!(TransportMode::Udp.udp() && !TransportMode::Udp.tcp());
        assert!(!TransportMode::Tcp.udp() && TransportMode::Tcp.tcp());
    }
}
