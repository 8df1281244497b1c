//! Outgoing IRC commands.
//!
//! An [`OutgoingCommand`] is a `{}`-placeholder template plus its arguments.
//! Only the IRC writer task renders and transmits them.

use crate::app::event::LogMessage;
use std::fmt;
use thiserror::Error;

const PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("template {template:?} expects {expected} arguments, got {got}")]
    ArgumentCount {
        template: &'static str,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingCommand {
    template: &'static str,
    args: Vec<String>,
}

impl OutgoingCommand {
    pub fn new(template: &'static str, args: Vec<String>) -> Self {
        Self { template, args }
    }

    pub fn nick(nick: &str) -> Self {
        Self::new("NICK {}", vec![nick.to_string()])
    }

    /// `USER` registration with the nickname as username and realname.
    pub fn user(nick: &str) -> Self {
        Self::new("USER {} 0 * :{}", vec![nick.to_string(), nick.to_string()])
    }

    pub fn pong(token: &str) -> Self {
        Self::new("PONG {}", vec![token.to_string()])
    }

    pub fn join(channel: &str) -> Self {
        Self::new("JOIN {}", vec![channel.to_string()])
    }

    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("PRIVMSG {} :{}", vec![target.to_string(), text.to_string()])
    }

    /// Relay a log line into `channel` as `[<tag>] <payload>`.
    pub fn relay(channel: &str, message: &LogMessage) -> Self {
        Self::new(
            "PRIVMSG {} :[{}] {}",
            vec![
                channel.to_string(),
                message.tag.clone(),
                message.payload.clone(),
            ],
        )
    }

    /// Substitute the arguments into the template, in order.
    ///
    /// CR and LF inside arguments become spaces so the result is always a
    /// single protocol line.
    pub fn render(&self) -> Result<String, CommandError> {
        let expected = self.template.matches(PLACEHOLDER).count();
        if expected != self.args.len() {
            return Err(CommandError::ArgumentCount {
                template: self.template,
                expected,
                got: self.args.len(),
            });
        }

        let capacity = self.template.len() + self.args.iter().map(String::len).sum::<usize>();
        let mut line = String::with_capacity(capacity);
        let mut pieces = self.template.split(PLACEHOLDER);
        if let Some(first) = pieces.next() {
            line.push_str(first);
        }
        for (piece, arg) in pieces.zip(&self.args) {
            line.extend(arg.chars().map(|c| if c == '\r' || c == '\n' { ' ' } else { c }));
            line.push_str(piece);
        }
        Ok(line)
    }
}

impl fmt::Display for OutgoingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(line) => f.write_str(&line),
            Err(_) => write!(f, "{} {:?}", self.template, self.args),
        }
    }
}
