mod app;
mod config;
mod ingest;
mod irc;
mod logging;

use crate::app::dispatcher::{Dispatcher, EventSources};
use crate::app::state::ConnectionState;
use crate::app::QUEUE_CAPACITY;
use crate::config::{AppConfig, LogFormat, Overrides, TransportMode};
use crate::ingest::tag::TagResolver;
use crate::ingest::tcp::TcpLogListener;
use crate::ingest::udp::UdpLogListener;
use crate::irc::connection::{ConnectionError, IrcConnection};
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{error, info};

/// Relay UDP and TCP log lines into an IRC channel.
#[derive(Debug, Parser)]
#[command(name = "irclog", version, disable_help_flag = true)]
struct Cli {
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// IRC server, as `host` or `host:port`.
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// IRC server port.
    #[arg(long)]
    irc_port: Option<u16>,

    /// IRC nickname.
    #[arg(short, long)]
    nick: Option<String>,

    /// IRC channel to relay into.
    #[arg(short, long)]
    channel: Option<String>,

    /// Port the log listeners bind to.
    #[arg(short, long)]
    port: Option<u16>,

    /// Which log listeners to start.
    #[arg(short, long, value_enum)]
    mode: Option<TransportMode>,

    /// Tag senders by address, skipping reverse DNS.
    #[arg(long)]
    no_resolve: bool,

    /// Log filter, e.g. `debug` or `irclog=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            irc_port: self.irc_port,
            nickname: self.nick.clone(),
            channel: self.channel.clone(),
            ingest_port: self.port,
            mode: self.mode,
            no_resolve: self.no_resolve,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config(cli.config.as_deref())?;
    cfg.apply(cli.overrides());
    cfg.validate()?;

    logging::init(&cfg.logging)?;
    info!(
        irc = %format!("{}:{}", cfg.irc.host, cfg.irc.port),
        nick = %cfg.irc.nickname,
        channel = %cfg.irc.channel,
        ingest = %cfg.ingest.socket_addr(),
        mode = ?cfg.ingest.mode,
        "starting irclog"
    );

    let result = run(cfg).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Start every component and wait for the first fatal condition.
async fn run(cfg: AppConfig) -> Result<()> {
    let state = Arc::new(ConnectionState::from_config(&cfg.irc));
    let resolver = TagResolver::from_config(cfg.ingest.resolve_hostnames);
    let addr = cfg.ingest.socket_addr();

    let udp = if cfg.ingest.mode.udp() {
        let listener = UdpLogListener::bind(addr, resolver).await?;
        info!(addr = %listener.local_addr()?, "accepting udp logs");
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(async move {
            if let Err(e) = listener.run(tx).await {
                error!(error = %e, "udp listener stopped");
            }
        });
        Some(rx)
    } else {
        None
    };

    let tcp = if cfg.ingest.mode.tcp() {
        let listener = TcpLogListener::bind(addr, resolver).await?;
        info!(addr = %listener.local_addr()?, "accepting tcp logs");
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(listener.run(tx));
        Some(rx)
    } else {
        None
    };

    let IrcConnection {
        incoming,
        queue,
        reader,
        writer,
    } = irc::connection::connect(&state).await?;

    let sources = EventSources {
        irc: incoming,
        udp,
        tcp,
    };
    let dispatcher = Dispatcher::new(Arc::clone(&state), queue);

    tokio::select! {
        result = dispatcher.run(sources) => result.context("dispatcher stopped"),
        result = reader => task_outcome("irc reader", result),
        result = writer => task_outcome("irc writer", result),
    }
}

fn task_outcome(name: &str, result: Result<Result<(), ConnectionError>, JoinError>) -> Result<()> {
    match result {
        Ok(Ok(())) => Err(anyhow!("{name} stopped")),
        Ok(Err(e)) => Err(anyhow::Error::new(e).context(format!("{name} failed"))),
        Err(e) => Err(anyhow::Error::new(e).context(format!("{name} panicked"))),
    }
}
