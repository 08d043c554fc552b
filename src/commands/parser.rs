//! Prefix command tokenizer
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use thiserror::Error;

/// Reasons a message is not dispatched as a command
///
/// Both are expected outcomes and are dropped silently by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("message does not start with the command prefix")]
    NotACommand,
    #[error("message is only the command prefix")]
    EmptyCommand,
}

/// Split a message into `[command, args...]`
///
/// The command name has its prefix removed and is ASCII-lowercased; arguments
/// are returned verbatim in their original order.
pub fn parse(raw: &str, prefix: char) -> Result<Vec<String>, ParseError> {
    let mut tokens = raw.split_whitespace();

    let first = tokens.next().ok_or(ParseError::NotACommand)?;
    let name = first.strip_prefix(prefix).ok_or(ParseError::NotACommand)?;
    if name.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    let mut parsed = vec![name.to_ascii_lowercase()];
    parsed.extend(tokens.map(str::to_string));
    Ok(parsed)
}
