//! Serial link driver for Tripwire nodes
//!
//! Wires a serial port to the line protocol: bytes are pulled into a
//! [`LineBuffer`](tripwire_protocol::LineBuffer), complete lines are parsed
//! into a reusable [`Message`](tripwire_protocol::Message), and outbound
//! messages are encoded with this node's source id and written back out.
//!
//! The driver is poll-based and never blocks. Device logic calls
//! [`SerialLink::poll`] from its main loop and reacts to each message.
//!
//! ```text
//! SerialRx ──▶ LineBuffer ──▶ parse ──▶ &Message ──▶ device logic
//!                                                        │
//! SerialTx ◀── LineEncoder ◀─────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

// Must go first so the other modules see its macros
mod fmt;

pub mod config;
pub mod link;

pub use config::NodeConfig;
pub use link::{LinkError, LinkStats, SerialLink};
