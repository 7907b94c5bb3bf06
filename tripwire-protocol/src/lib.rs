//! Tripwire Line Protocol
//!
//! This crate defines the text protocol spoken between sensor/alarm nodes
//! sharing a serial link. Every message is one line of comma-separated
//! fields:
//!
//! ```text
//! ┌────────┬──────┬──────┬───────┬─────────┬────────────┐
//! │ SOURCE │ TYPE │ NAME │ STATE │ [EXTRA] │ TERMINATOR │
//! │ 1-3    │ 1-3  │ 1-29 │ 1-99  │ 1-99    │ \n or \r   │
//! └────────┴──────┴──────┴───────┴─────────┴────────────┘
//! ```
//!
//! e.g. `5,2,Hallway,trp\n` is node 5 reporting its `Hallway` motion sensor
//! as tripped.
//!
//! The crate is split along the receive path:
//!
//! - [`buffer::LineBuffer`] accumulates bytes from the serial port, finds
//!   terminators and compacts consumed lines away
//! - [`parse`] tokenizes one line into a [`Message`]
//! - [`encode::LineEncoder`] turns fields back into a wire line
//!
//! All storage is fixed-capacity; nothing allocates.
//!
//! Fields have no escaping. Text containing `,`, `\n` or `\r` cannot be
//! represented and is rejected by the encoder.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod encode;
pub mod message;
pub mod parse;
pub mod vocab;

pub use buffer::{Accept, Fill, LineBuffer};
pub use encode::{
    clean_field, encode_message, format_int, EncodeError, Field, LineEncoder, SourceId,
    MAX_LINE_SIZE,
};
pub use message::{Message, DELIMITER, MAX_SERIAL_IN, MSG_INT_SIZE, NAME_SIZE};
pub use parse::{parse_line, tokens, ParseError};
pub use vocab::{MessageType, StatusState, TripState, USER_INPUT};
