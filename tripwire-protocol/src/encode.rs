//! Line encoding for outbound messages
//!
//! ```text
//! source,type,name,state\n
//! source,type,name,state,extra\n
//! ```
//!
//! There is no escaping. A field must be non-empty, fit its budget, and
//! contain none of `,` `\n` `\r`; anything else is refused with
//! [`EncodeError::InvalidField`] rather than producing an ambiguous line.
//!
//! The whole line, newline included, must also fit a peer's receive
//! buffer ([`MAX_SERIAL_IN`] bytes). Fields that are each within budget can
//! still add up to more; such lines fail with [`EncodeError::LineTooLong`].

use core::fmt::{self, Write as _};

use heapless::{String, Vec};

use crate::message::{
    is_terminator, Message, DELIMITER, EXTRA_LEN, INFO_LEN, MAX_SERIAL_IN, MSG_INT_SIZE, NAME_LEN,
    SOURCE_LEN, TYPE_LEN,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest encoded line a peer can receive, newline included
pub const MAX_LINE_SIZE: usize = MAX_SERIAL_IN;

/// Text budget for an integer payload
pub const INT_LEN: usize = MSG_INT_SIZE - 1;

/// Line field, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Node id
    Source,
    /// Message type code
    Type,
    /// Entity name
    Name,
    /// Primary state or info
    State,
    /// Optional extra payload
    Extra,
}

/// Errors that can occur while encoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Field empty, too long, or containing a delimiter/terminator
    InvalidField(Field),
    /// Integer payload does not fit in three characters
    IntOutOfRange,
    /// Encoded line would not fit a receive buffer
    LineTooLong,
    /// Output buffer too small
    BufferTooSmall,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidField(field) => write!(f, "invalid {:?} field", field),
            EncodeError::IntOutOfRange => f.write_str("integer payload out of range"),
            EncodeError::LineTooLong => f.write_str("line longer than receive buffer"),
            EncodeError::BufferTooSmall => f.write_str("output buffer too small"),
        }
    }
}

/// Node identity sent as the source of every outbound line
///
/// Limited to three decimal digits by the source field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct SourceId(u16);

impl SourceId {
    /// Largest representable id
    pub const MAX: u16 = 999;

    /// Create an id, or `None` if it does not fit the source field
    pub const fn new(id: u16) -> Option<Self> {
        if id <= Self::MAX {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for SourceId {
    type Error = EncodeError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(EncodeError::InvalidField(Field::Source))
    }
}

impl From<SourceId> for u16 {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

/// Format an integer payload as decimal text
///
/// Only values with at most three characters fit (`-99..=999`); larger
/// ones fail instead of being cut short.
pub fn format_int(value: i32) -> Result<String<INT_LEN>, EncodeError> {
    let mut text = String::new();
    write!(text, "{}", value).map_err(|_| EncodeError::IntOutOfRange)?;
    Ok(text)
}

/// Replace delimiter and terminator characters with spaces
///
/// For free text (log lines, names typed by a user) that must become a
/// valid field. Output is cut at `N` bytes.
pub fn clean_field<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        let c = if matches!(c, ',' | '\n' | '\r') { ' ' } else { c };
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Encodes outbound lines on behalf of one node
#[derive(Debug, Clone, Copy)]
pub struct LineEncoder {
    source: SourceId,
}

impl LineEncoder {
    pub const fn new(source: SourceId) -> Self {
        Self { source }
    }

    /// The source id stamped on every line
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Encode `source,type,name,state[,extra]\n`
    ///
    /// An empty `extra` is treated as absent.
    pub fn encode(
        &self,
        msg_type: &str,
        name: &str,
        state: &str,
        extra: Option<&str>,
    ) -> Result<Vec<u8, MAX_LINE_SIZE>, EncodeError> {
        let mut source: String<SOURCE_LEN> = String::new();
        write!(source, "{}", self.source.get())
            .map_err(|_| EncodeError::InvalidField(Field::Source))?;
        write_line(&source, msg_type, name, state, extra)
    }

    /// Encode into a caller buffer
    ///
    /// Returns the number of bytes written
    pub fn encode_into(
        &self,
        buffer: &mut [u8],
        msg_type: &str,
        name: &str,
        state: &str,
        extra: Option<&str>,
    ) -> Result<usize, EncodeError> {
        let line = self.encode(msg_type, name, state, extra)?;
        buffer
            .get_mut(..line.len())
            .ok_or(EncodeError::BufferTooSmall)?
            .copy_from_slice(&line);
        Ok(line.len())
    }

    /// Encode with an integer sent as the extra payload
    pub fn encode_with_int(
        &self,
        msg_type: &str,
        name: &str,
        state: &str,
        value: i32,
    ) -> Result<Vec<u8, MAX_LINE_SIZE>, EncodeError> {
        let extra = format_int(value)?;
        self.encode(msg_type, name, state, Some(extra.as_str()))
    }

    /// Encode with an integer sent as the state
    pub fn encode_int_state(
        &self,
        msg_type: &str,
        name: &str,
        value: i32,
    ) -> Result<Vec<u8, MAX_LINE_SIZE>, EncodeError> {
        let state = format_int(value)?;
        self.encode(msg_type, name, state.as_str(), None)
    }
}

/// Re-encode a parsed record, keeping its original source
pub fn encode_message(msg: &Message) -> Result<Vec<u8, MAX_LINE_SIZE>, EncodeError> {
    write_line(&msg.source, &msg.msg_type, &msg.name, &msg.info, msg.extra())
}

fn check(field: Field, text: &str, max: usize) -> Result<(), EncodeError> {
    let bad_byte = text
        .bytes()
        .any(|b| b == DELIMITER || is_terminator(b));
    if text.is_empty() || text.len() > max || bad_byte {
        return Err(EncodeError::InvalidField(field));
    }
    Ok(())
}

fn write_line(
    source: &str,
    msg_type: &str,
    name: &str,
    state: &str,
    extra: Option<&str>,
) -> Result<Vec<u8, MAX_LINE_SIZE>, EncodeError> {
    let extra = extra.filter(|e| !e.is_empty());

    check(Field::Source, source, SOURCE_LEN)?;
    check(Field::Type, msg_type, TYPE_LEN)?;
    check(Field::Name, name, NAME_LEN)?;
    check(Field::State, state, INFO_LEN)?;
    if let Some(extra) = extra {
        check(Field::Extra, extra, EXTRA_LEN)?;
    }

    let fields = [source, msg_type, name, state];
    // Delimiters between fields plus the newline
    let total: usize = fields
        .iter()
        .chain(extra.iter())
        .map(|text| text.len() + 1)
        .sum();
    if total > MAX_LINE_SIZE {
        return Err(EncodeError::LineTooLong);
    }

    let mut line = Vec::new();
    for (i, text) in fields.iter().chain(extra.iter()).enumerate() {
        if i > 0 {
            line.push(DELIMITER)
                .map_err(|_| EncodeError::LineTooLong)?;
        }
        line.extend_from_slice(text.as_bytes())
            .map_err(|_| EncodeError::LineTooLong)?;
    }
    line.push(b'\n').map_err(|_| EncodeError::LineTooLong)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_line;

    fn encoder(id: u16) -> LineEncoder {
        LineEncoder::new(SourceId::new(id).unwrap())
    }

    #[test]
    fn test_encode_without_extra() {
        let line = encoder(5).encode("2", "Door1", "trp", None).unwrap();
        assert_eq!(&line[..], b"5,2,Door1,trp\n");
    }

    #[test]
    fn test_encode_with_extra() {
        let line = encoder(17)
            .encode("101", "Log", "Boot", Some("v1.2"))
            .unwrap();
        assert_eq!(&line[..], b"17,101,Log,Boot,v1.2\n");
    }

    #[test]
    fn test_empty_extra_is_absent() {
        let line = encoder(5).encode("2", "Door1", "trp", Some("")).unwrap();
        assert_eq!(&line[..], b"5,2,Door1,trp\n");
    }

    #[test]
    fn test_encode_int_state() {
        let line = encoder(5).encode_int_state("2", "Zone1", 7).unwrap();
        assert_eq!(&line[..], b"5,2,Zone1,7\n");
    }

    #[test]
    fn test_encode_with_int_extra() {
        let line = encoder(3)
            .encode_with_int("100", "Panel", "Delayed", 30)
            .unwrap();
        assert_eq!(&line[..], b"3,100,Panel,Delayed,30\n");
    }

    #[test]
    fn test_int_range() {
        assert_eq!(format_int(999).unwrap().as_str(), "999");
        assert_eq!(format_int(-99).unwrap().as_str(), "-99");
        assert_eq!(format_int(1000), Err(EncodeError::IntOutOfRange));
        assert_eq!(format_int(-100), Err(EncodeError::IntOutOfRange));
        assert_eq!(
            encoder(1).encode_int_state("2", "Zone1", 4096),
            Err(EncodeError::IntOutOfRange)
        );
    }

    #[test]
    fn test_rejects_unrepresentable_fields() {
        let enc = encoder(5);
        assert_eq!(
            enc.encode("2", "Door,1", "trp", None),
            Err(EncodeError::InvalidField(Field::Name))
        );
        assert_eq!(
            enc.encode("2", "Door1", "tr\np", None),
            Err(EncodeError::InvalidField(Field::State))
        );
        assert_eq!(
            enc.encode("", "Door1", "trp", None),
            Err(EncodeError::InvalidField(Field::Type))
        );
        assert_eq!(
            enc.encode("2", "Door1", "trp", Some("a\rb")),
            Err(EncodeError::InvalidField(Field::Extra))
        );
        assert_eq!(
            enc.encode("2", "abcdefghijklmnopqrstuvwxyz0123", "trp", None),
            Err(EncodeError::InvalidField(Field::Name))
        );
        assert_eq!(
            enc.encode("1000", "Door1", "trp", None),
            Err(EncodeError::InvalidField(Field::Type))
        );
    }

    #[test]
    fn test_encode_into() {
        let mut buffer = [0u8; 32];
        let len = encoder(5)
            .encode_into(&mut buffer, "1", "Front", "clr", None)
            .unwrap();
        assert_eq!(&buffer[..len], b"5,1,Front,clr\n");

        let mut small = [0u8; 8];
        assert_eq!(
            encoder(5).encode_into(&mut small, "1", "Front", "clr", None),
            Err(EncodeError::BufferTooSmall)
        );
    }

    #[test]
    fn test_source_id_bounds() {
        assert_eq!(SourceId::new(999).map(SourceId::get), Some(999));
        assert!(SourceId::new(1000).is_none());
        assert_eq!(SourceId::try_from(1000), Err(EncodeError::InvalidField(Field::Source)));
        assert_eq!(u16::from(SourceId::default()), 0);
    }

    #[test]
    fn test_encode_message_relays_source() {
        let msg = parse_line(b"42,0,Keypad,trp,9").unwrap();
        let line = encode_message(&msg).unwrap();
        assert_eq!(&line[..], b"42,0,Keypad,trp,9\n");
        assert_eq!(parse_line(&line).unwrap(), msg);
    }

    #[test]
    fn test_clean_field() {
        let name: String<NAME_LEN> = clean_field("Back,door\r\n");
        assert_eq!(name.as_str(), "Back door  ");

        let short: String<4> = clean_field("abcdef");
        assert_eq!(short.as_str(), "abcd");
    }

    #[test]
    fn test_fields_in_budget_can_overflow_line() {
        let name = [b'n'; NAME_LEN];
        let info = [b'i'; INFO_LEN];
        let result = encoder(5).encode(
            "2",
            core::str::from_utf8(&name).unwrap(),
            core::str::from_utf8(&info).unwrap(),
            None,
        );
        assert_eq!(result, Err(EncodeError::LineTooLong));
    }

    #[test]
    fn test_longest_line_reaches_peer() {
        // "5,2,Zone1," is 10 bytes, leaving 89 for the state and 1 for '\n'
        let info = [b'i'; 89];
        let line = encoder(5)
            .encode("2", "Zone1", core::str::from_utf8(&info).unwrap(), None)
            .unwrap();
        assert_eq!(line.len(), MAX_SERIAL_IN);

        let mut buf = crate::buffer::LineBuffer::new();
        let fill = buf.extend_from_slice(&line);
        assert_eq!(fill.stored, MAX_SERIAL_IN);
        assert!(!fill.overflow);

        let msg = buf.next_line(parse_line).unwrap().unwrap();
        assert_eq!(msg.info.len(), 89);
        assert!(buf.is_empty());

        let longer = [b'i'; 90];
        assert_eq!(
            encoder(5).encode("2", "Zone1", core::str::from_utf8(&longer).unwrap(), None),
            Err(EncodeError::LineTooLong)
        );
    }
}
