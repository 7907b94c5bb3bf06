//! The five-field message record and its size limits

use heapless::String;

use crate::vocab::{MessageType, StatusState, TripState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity of the receive buffer and of any single line
pub const MAX_SERIAL_IN: usize = 100;

/// Budget for the numeric fields (source, type), terminator included
pub const MSG_INT_SIZE: usize = 4;

/// Budget for the entity name, terminator included
pub const NAME_SIZE: usize = 30;

/// Field separator
pub const DELIMITER: u8 = b',';

/// Maximum source text length
pub const SOURCE_LEN: usize = MSG_INT_SIZE - 1;
/// Maximum type code length
pub const TYPE_LEN: usize = MSG_INT_SIZE - 1;
/// Maximum name length
pub const NAME_LEN: usize = NAME_SIZE - 1;
/// Maximum info/state length
pub const INFO_LEN: usize = MAX_SERIAL_IN - 1;
/// Maximum extra payload length
pub const EXTRA_LEN: usize = MAX_SERIAL_IN - 1;

/// Returns true for the bytes that end a line
pub const fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// One parsed wire line
///
/// A record is either fully cleared or holds at least `source`, `msg_type`,
/// `name` and `info`. `extra` is empty when the sender omitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Sending node id, as text
    pub source: String<SOURCE_LEN>,
    /// Message type code, as text
    pub msg_type: String<TYPE_LEN>,
    /// Entity (sensor, door, panel) name
    pub name: String<NAME_LEN>,
    /// Primary state or info
    pub info: String<INFO_LEN>,
    /// Optional extra payload
    pub extra: String<EXTRA_LEN>,
}

impl Message {
    /// Create an empty record
    pub const fn new() -> Self {
        Self {
            source: String::new(),
            msg_type: String::new(),
            name: String::new(),
            info: String::new(),
            extra: String::new(),
        }
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        self.source.clear();
        self.msg_type.clear();
        self.name.clear();
        self.info.clear();
        self.extra.clear();
    }

    /// Returns true if no field holds data
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
            && self.msg_type.is_empty()
            && self.name.is_empty()
            && self.info.is_empty()
            && self.extra.is_empty()
    }

    /// The extra payload, if one was sent
    pub fn extra(&self) -> Option<&str> {
        if self.extra.is_empty() {
            None
        } else {
            Some(self.extra.as_str())
        }
    }

    /// Numeric source id, if the source field is a number
    pub fn source_id(&self) -> Option<u16> {
        self.source.parse().ok()
    }

    /// Known message type, if the type code is one
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_code(&self.msg_type)
    }

    /// Status word carried in `info`, for status messages
    pub fn status(&self) -> Option<StatusState> {
        match self.message_type()? {
            MessageType::Status => StatusState::from_text(&self.info),
            _ => None,
        }
    }

    /// Trip state carried in `info`, for input/door/motion messages
    pub fn trip_state(&self) -> Option<TripState> {
        match self.message_type()? {
            t if t.is_sensor() => TripState::from_text(&self.info),
            _ => None,
        }
    }
}
