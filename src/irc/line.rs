//! Raw IRC line parser.
//!
//! Splits a single protocol line (without its terminator) into an optional
//! prefix, a command, and an ordered parameter list. The final parameter may
//! carry embedded spaces when the line contains a `" :"` trailing marker.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a raw line cannot be turned into an [`IrcLine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("line has no command token")]
    MissingCommand,
}

/// A parsed IRC protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcLine {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcLine {
    /// Parse a raw line.
    ///
    /// A leading `:` marks a prefix that runs up to the first space. The rest
    /// is split at the first `" :"` into space-delimited tokens and one
    /// trailing token; without the marker the whole remainder is split on
    /// single spaces. The first token is the command.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, rest) = stripped.split_once(' ').ok_or(ParseError::MissingCommand)?;
                (Some(prefix.to_string()), rest)
            }
            None => (None, line),
        };

        let mut tokens: Vec<String> = match rest.split_once(" :") {
            Some((head, trailing)) => {
                let mut tokens: Vec<String> = head.split(' ').map(str::to_string).collect();
                tokens.push(trailing.to_string());
                tokens
            }
            None => rest.split(' ').map(str::to_string).collect(),
        };

        // `split` always yields at least one token
        let command = tokens.remove(0);
        if command.is_empty() {
            return Err(ParseError::MissingCommand);
        }

        Ok(Self {
            prefix,
            command,
            params: tokens,
        })
    }
}

impl FromStr for IrcLine {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IrcLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(prefix={}, cmd={}, args={:?})",
            self.prefix.as_deref().unwrap_or(""),
            self.command,
            self.params
        )
    }
}
