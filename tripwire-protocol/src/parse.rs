//! Line tokenizer and parser
//!
//! Splits one wire line on `,` into a [`Message`]. The tokenizer skips
//! runs of delimiters instead of producing empty tokens, so `5,,2` reads
//! as the two tokens `5` and `2`. Existing senders rely on this; a blank
//! field shifts every later field left.
//!
//! A line ends at the first `\n`, `\r` or NUL byte. Senders writing C
//! strings into the line leave a NUL behind, and nothing after it is data.

use core::fmt;
use core::str;

use heapless::String;

use crate::message::{is_terminator, Message, DELIMITER, MAX_SERIAL_IN};

/// Errors that can occur while parsing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line holds no data
    EmptyInput,
    /// Too few tokens, or a required token exceeds its field
    MalformedMessage,
    /// Line does not fit the scratch copy
    TruncatedCopy,
    /// A token is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => f.write_str("empty line"),
            ParseError::MalformedMessage => f.write_str("malformed message"),
            ParseError::TruncatedCopy => f.write_str("line longer than receive buffer"),
            ParseError::InvalidUtf8 => f.write_str("field is not valid UTF-8"),
        }
    }
}

/// Non-empty `,`-separated tokens of a line
pub fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|&b| b == DELIMITER)
        .filter(|token| !token.is_empty())
}

/// Parse one line into a new record
///
/// Anything from the first `\n`, `\r` or NUL on is ignored, so both a bare
/// line and an encoded line with its terminator are accepted.
pub fn parse_line(line: &[u8]) -> Result<Message, ParseError> {
    let mut msg = Message::new();
    msg.parse_from(line)?;
    Ok(msg)
}

impl Message {
    /// Parse a line into this record, reusing its storage
    ///
    /// On error the record is left cleared; no field of a rejected line
    /// survives.
    pub fn parse_from(&mut self, line: &[u8]) -> Result<(), ParseError> {
        self.clear();
        let result = self.fill_fields(line);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn fill_fields(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let end = line
            .iter()
            .position(|&b| is_terminator(b) || b == 0)
            .unwrap_or(line.len());
        let line = &line[..end];

        if line.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        if line.len() >= MAX_SERIAL_IN {
            return Err(ParseError::TruncatedCopy);
        }

        let mut tokens = tokens(line);
        self.source = required(tokens.next())?;
        self.msg_type = required(tokens.next())?;
        self.name = required(tokens.next())?;
        self.info = required(tokens.next())?;

        // Optional: an over-long extra is dropped, not an error
        if let Some(token) = tokens.next() {
            match field(token) {
                Ok(extra) => self.extra = extra,
                Err(ParseError::InvalidUtf8) => return Err(ParseError::InvalidUtf8),
                Err(_) => {}
            }
        }

        Ok(())
    }
}

fn required<const N: usize>(token: Option<&[u8]>) -> Result<String<N>, ParseError> {
    token.ok_or(ParseError::MalformedMessage).and_then(field)
}

/// Copy a token into a field, rejecting tokens that do not fit
fn field<const N: usize>(token: &[u8]) -> Result<String<N>, ParseError> {
    let text = str::from_utf8(token).map_err(|_| ParseError::InvalidUtf8)?;
    let mut out = String::new();
    out.push_str(text)
        .map_err(|_| ParseError::MalformedMessage)?;
    Ok(out)
}
