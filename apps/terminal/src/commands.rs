//! Commands typed at the prompt.

use shared::domain::{HobbyId, MeetingId};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  show             print the page again
  refresh          re-fetch every view
  next | prev      move through popular hobbies
  page N           jump to popular hobbies page N
  add NAME         add a hobby (NAME may contain spaces)
  remove ID        remove one of your hobbies
  cancel ID        cancel a one-on-one
  logout           end the session
  help             this text
  quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Refresh,
    Next,
    Previous,
    Page(u32),
    Add(String),
    Remove(HobbyId),
    Cancel(MeetingId),
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a valid number")]
    BadNumber(String),
}

/// Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "show" => Command::Show,
        "refresh" => Command::Refresh,
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "page" => Command::Page(number(rest, "page", "a page number")?),
        // Names are passed through untouched; the backend decides what is valid.
        "add" => Command::Add(rest.to_string()),
        "remove" => Command::Remove(HobbyId(number(rest, "remove", "a hobby id")?)),
        "cancel" => Command::Cancel(MeetingId(number(rest, "cancel", "a meeting id")?)),
        "logout" => Command::Logout,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::Unknown(verb.to_string())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(
    raw: &str,
    command: &'static str,
    expected: &'static str,
) -> Result<T, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::MissingArgument { command, expected });
    }
    raw.parse()
        .map_err(|_| ParseError::BadNumber(raw.to_string()))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
