//! The static command table.
//!
//! Recognized server commands form a closed enumeration; everything else is
//! ignored. Handlers are pure: they only return the commands to enqueue.

use crate::app::action::OutgoingCommand;
use crate::app::event::RelayEvent;
use crate::app::state::ConnectionState;
use crate::irc::line::IrcLine;
use tracing::{debug, warn};

/// Texts that are echoed back by the `PRIVMSG` handler.
const GREETINGS: &[&str] = &["hello", "hi"];

const WELCOME: &str = "Hello World.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrcCommand {
    Ping,
    Mode,
    Privmsg,
    Join,
}

impl IrcCommand {
    pub const ALL: [IrcCommand; 4] = [
        IrcCommand::Ping,
        IrcCommand::Mode,
        IrcCommand::Privmsg,
        IrcCommand::Join,
    ];

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            IrcCommand::Ping => "PING",
            IrcCommand::Mode => "MODE",
            IrcCommand::Privmsg => "PRIVMSG",
            IrcCommand::Join => "JOIN",
        }
    }

    /// Apply this command's behavior to `params`.
    pub fn handle(self, state: &ConnectionState, params: &[String]) -> Vec<OutgoingCommand> {
        match self {
            IrcCommand::Ping => match params.first() {
                Some(token) => vec![OutgoingCommand::pong(token)],
                None => {
                    debug!("PING without a token");
                    vec![]
                }
            },
            // Treated as the sign that registration is complete
            IrcCommand::Mode => vec![OutgoingCommand::join(&state.channel)],
            IrcCommand::Privmsg => match params {
                [target, text, ..] if GREETINGS.contains(&text.as_str()) => {
                    vec![OutgoingCommand::privmsg(target, text)]
                }
                _ => vec![],
            },
            IrcCommand::Join => match params.first() {
                Some(target) => vec![OutgoingCommand::privmsg(target, WELCOME)],
                None => vec![],
            },
        }
    }
}

/// Turn one event into the commands it causes.
pub fn handle_event(state: &ConnectionState, event: RelayEvent) -> Vec<OutgoingCommand> {
    match event {
        RelayEvent::IrcLine(raw) => handle_irc_line(state, &raw),
        RelayEvent::Log { origin, message } => {
            debug!("{} logger >>> [{}] {}", origin, message.tag, message.payload);
            vec![OutgoingCommand::relay(&state.channel, &message)]
        }
    }
}

pub fn handle_irc_line(state: &ConnectionState, raw: &str) -> Vec<OutgoingCommand> {
    let line = match IrcLine::parse(raw) {
        Ok(line) => line,
        Err(e) => {
            warn!(line = %raw, error = %e, "skipping malformed IRC line");
            return vec![];
        }
    };
    debug!("incoming <<< {}", line);

    match IrcCommand::lookup(&line.command) {
        Some(command) => command.handle(state, &line.params),
        None => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::{LogMessage, LogOrigin};

    fn state() -> ConnectionState {
        ConnectionState {
            host: "irc.example.net".into(),
            port: 6667,
            nick: "logbot".into(),
            channel: "#logs".into(),
        }
    }

    fn rendered(commands: Vec<OutgoingCommand>) -> Vec<String> {
        commands.iter().map(|c| c.render().unwrap()).collect()
    }

    fn irc(line: &str) -> Vec<String> {
        rendered(handle_irc_line(&state(), line))
    }

    #[test]
    fn test_lookup() {
        assert_eq!(IrcCommand::lookup("PING"), Some(IrcCommand::Ping));
        assert_eq!(IrcCommand::lookup("MODE"), Some(IrcCommand::Mode));
        assert_eq!(IrcCommand::lookup("PRIVMSG"), Some(IrcCommand::Privmsg));
        assert_eq!(IrcCommand::lookup("JOIN"), Some(IrcCommand::Join));
        assert_eq!(IrcCommand::lookup("NOTICE"), None);
        assert_eq!(IrcCommand::lookup("001"), None);
        for cmd in IrcCommand::ALL {
            assert_eq!(IrcCommand::lookup(cmd.name()), Some(cmd));
        }
    }

    #[test]
    fn test_ping() {
        assert_eq!(irc("PING :server1"), vec!["PONG server1"]);
        assert_eq!(irc("PING"), Vec::<String>::new());
    }

    #[test]
    fn test_mode_joins_channel() {
        assert_eq!(irc(":logbot MODE logbot :+i"), vec!["JOIN #logs"]);
    }

    #[test]
    fn test_privmsg_greetings() {
        assert_eq!(irc(":a!b@c PRIVMSG #logs :hi"), vec!["PRIVMSG #logs :hi"]);
        assert_eq!(irc(":a!b@c PRIVMSG #logs :hello"), vec!["PRIVMSG #logs :hello"]);
        assert_eq!(irc(":a!b@c PRIVMSG #logs :hello there"), Vec::<String>::new());
        assert_eq!(irc(":a!b@c PRIVMSG #logs :Hi"), Vec::<String>::new());
        assert_eq!(irc(":a!b@c PRIVMSG #logs"), Vec::<String>::new());
    }

    #[test]
    fn test_join_welcome() {
        assert_eq!(
            irc(":logbot!u@h JOIN :#logs"),
            vec!["PRIVMSG #logs :Hello World."]
        );
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_ignored() {
        assert!(irc(":srv 001 logbot :Welcome").is_empty());
        assert!(irc("NOTICE * :hi").is_empty());
        assert!(irc("").is_empty());
        assert!(irc(":onlyprefix").is_empty());
    }

    #[test]
    fn test_log_message_relays_once() {
        for origin in [LogOrigin::Udp, LogOrigin::Tcp] {
            let event = RelayEvent::Log {
                origin,
                message: LogMessage::new("1.2.3.4", "test"),
            };
            assert_eq!(
                rendered(handle_event(&state(), event)),
                vec!["PRIVMSG #logs :[1.2.3.4] test"]
            );
        }
    }
}
