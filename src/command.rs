//! Chat command parsing
//!
//! Chat payloads are read as `<command> [args...]`, split on whitespace.
//! The command set is closed: `help`, `list`, `chat <index>`.

use crate::error::CommandError;

/// Reply text for `help`
pub const USAGE: &str = "Commands: help, list, chat <user>";

/// Known server commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Chat,
}

impl Command {
    /// Map a command token to a command, `None` if unknown
    pub fn classify(token: &str) -> Option<Self> {
        match token {
            "help" => Some(Command::Help),
            "list" => Some(Command::List),
            "chat" => Some(Command::Chat),
            _ => None,
        }
    }

    /// Number of required arguments
    pub fn arity(self) -> usize {
        match self {
            Command::Help | Command::List => 0,
            Command::Chat => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::List => "list",
            Command::Chat => "chat",
        }
    }
}

/// A command with its arguments checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Help,
    List,
    /// Raw target index as typed; validated by the coordinator
    Chat { target: String },
}

/// Parse a chat payload into a request
pub fn parse(payload: &str) -> Result<Request, CommandError> {
    let mut tokens = payload.split_whitespace();
    let command = tokens
        .next()
        .and_then(Command::classify)
        .ok_or(CommandError::UnrecognizedCommand)?;
    let args: Vec<&str> = tokens.collect();

    if args.len() != command.arity() {
        return Err(CommandError::InvalidArguments {
            command: command.name(),
            expected: command.arity(),
            actual: args.len(),
        });
    }

    Ok(match command {
        Command::Help => Request::Help,
        Command::List => Request::List,
        Command::Chat => Request::Chat {
            target: args[0].to_string(),
        },
    })
}
