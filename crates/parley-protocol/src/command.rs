//! Cursor-based view over a tokenized command line.
//!
//! Handlers receive a [`ServerCommand`] per line: token 0 is the command
//! name, the remaining tokens are positional arguments pulled off one at a
//! time through the cursor accessors.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Errors surfaced while converting an argument token.
///
/// A present-but-unparsable numeric token is a hard failure, never a silent
/// zero; handlers translate these into `FAIL` replies.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// The token could not be parsed as an integer literal.
    #[error("invalid integer argument '{token}': {source}")]
    InvalidInt {
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// The token could not be parsed as a float literal.
    #[error("invalid float argument '{token}': {source}")]
    InvalidFloat {
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

/// A tokenized command line plus the cursor over its arguments.
///
/// The cursor starts at position 1 (the first argument) and advances
/// monotonically through the `next_*` accessors. Reading the command name
/// resets it, so a handler may re-walk the arguments by calling
/// [`ServerCommand::command`] again.
#[derive(Debug)]
pub struct ServerCommand {
    tokens: Vec<String>,
    next_index: usize,
}

impl ServerCommand {
    /// Wraps a token sequence produced by [`crate::tokenize`].
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            next_index: 1,
        }
    }

    /// Returns the command name (token 0) lower-cased, or an empty string
    /// when the sequence is empty. Resets the argument cursor to the first
    /// argument; calling this repeatedly is idempotent.
    pub fn command(&mut self) -> String {
        self.command_raw().to_ascii_lowercase()
    }

    /// Returns the command name with its case preserved, resetting the
    /// argument cursor.
    pub fn command_raw(&mut self) -> String {
        self.next_index = 1;
        self.tokens.first().cloned().unwrap_or_default()
    }

    /// Returns the next argument lower-cased, advancing the cursor.
    /// `None` once the cursor is past the last token.
    pub fn next_arg(&mut self) -> Option<String> {
        self.next_arg_raw().map(|token| token.to_ascii_lowercase())
    }

    /// Returns the next argument with its case preserved, advancing the
    /// cursor.
    pub fn next_arg_raw(&mut self) -> Option<String> {
        let token = self.tokens.get(self.next_index).cloned()?;
        self.next_index += 1;
        Some(token)
    }

    /// Returns the next argument parsed as an integer, advancing the cursor.
    ///
    /// Accepts decimal and `0x`/`0X`-prefixed hexadecimal literals,
    /// optionally signed. A leading zero does not select octal; `010`
    /// parses as decimal ten.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidInt`] when the token is present but
    /// not a valid integer literal.
    pub fn next_i64(&mut self) -> Result<Option<i64>, ArgumentError> {
        let Some(token) = self.next_arg_raw() else {
            return Ok(None);
        };
        parse_int_literal(&token)
            .map(Some)
            .map_err(|source| ArgumentError::InvalidInt { token, source })
    }

    /// Returns the next argument parsed as a float, advancing the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidFloat`] when the token is present
    /// but not a valid float literal.
    pub fn next_f64(&mut self) -> Result<Option<f64>, ArgumentError> {
        let Some(token) = self.next_arg_raw() else {
            return Ok(None);
        };
        token
            .parse()
            .map(Some)
            .map_err(|source| ArgumentError::InvalidFloat { token, source })
    }

    /// Number of argument tokens; 0 for an empty sequence.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// True when the line produced no tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<String>> for ServerCommand {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

/// Cloning yields a view with a fresh cursor at the first argument; a clone
/// never observes the donor's read position. This is deliberate, and the one
/// surprising copy behaviour of the type.
impl Clone for ServerCommand {
    fn clone(&self) -> Self {
        Self::new(self.tokens.clone())
    }
}

fn parse_int_literal(token: &str) -> Result<i64, ParseIntError> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        let magnitude = i64::from_str_radix(hex, 16)?;
        Ok(if negative { -magnitude } else { magnitude })
    } else {
        token.parse()
    }
}
