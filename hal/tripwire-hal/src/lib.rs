//! Tripwire Hardware Abstraction Layer
//!
//! This crate defines the serial traits the line protocol needs from the
//! outside world. A node only ever talks to one character stream, so the
//! surface is small: a non-blocking byte source and a byte sink.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device logic (door, motion, panel)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tripwire-node (link driver)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tripwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chip UART     │       │ embedded-io   │
//! │ drivers       │       │ ports         │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialRx`] - Non-blocking byte source
//! - [`uart::SerialTx`] - Byte sink
//! - [`uart::SerialSetup`] - Baud rate and framing
//! - [`io::EmbeddedIoPort`] - Adapter for `embedded-io` ports

#![no_std]
#![deny(unsafe_code)]

pub mod io;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use io::{EmbeddedIoPort, PortError};
pub use uart::{DataBits, Parity, SerialConfig, SerialRx, SerialSetup, SerialTx, StopBits};
