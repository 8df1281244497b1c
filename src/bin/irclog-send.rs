//! Send text to an irclog relay.
//!
//! Positional arguments are joined with spaces and sent as one message.
//! With `-` as the only argument, standard input is sent one line at a time.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, BufRead, Write};
use std::net::{TcpStream, UdpSocket};

const TAB_WIDTH: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "irclog-send", version, disable_help_flag = true)]
struct Cli {
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Relay host.
    #[arg(short = 'h', long, default_value = "localhost")]
    host: String,

    /// Relay port.
    #[arg(short, long, default_value_t = 5222)]
    port: u16,

    /// Send over TCP, one line per message, instead of one UDP datagram each.
    #[arg(long)]
    tcp: bool,

    /// Message words, or `-` to read standard input.
    #[arg(required = true)]
    message: Vec<String>,
}

enum Sink {
    Udp(UdpSocket),
    Tcp(TcpStream),
}

impl Sink {
    fn open(cli: &Cli) -> Result<Self> {
        let addr = (cli.host.as_str(), cli.port);
        if cli.tcp {
            let stream = TcpStream::connect(addr)
                .with_context(|| format!("Failed to connect to {}:{}", cli.host, cli.port))?;
            Ok(Sink::Tcp(stream))
        } else {
            let socket = UdpSocket::bind(("0.0.0.0", 0)).context("Failed to open UDP socket")?;
            socket
                .connect(addr)
                .with_context(|| format!("Failed to resolve {}:{}", cli.host, cli.port))?;
            Ok(Sink::Udp(socket))
        }
    }

    fn send(&mut self, text: &str) -> Result<()> {
        let text = expand_tabs(text);
        match self {
            Sink::Udp(socket) => {
                socket.send(text.as_bytes())?;
            }
            Sink::Tcp(stream) => {
                stream.write_all(text.as_bytes())?;
                stream.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut sink = Sink::open(&cli)?;

    if cli.message.len() == 1 && cli.message[0] == "-" {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read standard input")?;
            sink.send(&line)?;
        }
    } else {
        let text = cli.message.join(" ");
        if text.is_empty() {
            bail!("nothing to send");
        }
        sink.send(&text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("a\tb"), "a        b");
        assert_eq!(expand_tabs("plain"), "plain");
    }

    #[test]
    fn test_udp_send_is_one_datagram() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(std::time::Duration::from_secs(5)))
            .unwrap();
        let port = server.local_addr().unwrap().port().to_string();
        let cli =
            Cli::try_parse_from(["irclog-send", "-h", "127.0.0.1", "-p", port.as_str(), "x"]).unwrap();

        let mut sink = Sink::open(&cli).unwrap();
        sink.send("disk\tfull").unwrap();

        let mut buf = [0u8; 64];
        let n = server.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"disk        full");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
