//! Serial communication abstractions
//!
//! Provides the traits the line protocol needs from a UART (or any other
//! character stream). Reads never block: the caller polls.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serial receiver
///
/// Non-blocking byte source. Implementations report how many bytes can be
/// read right now and hand them out one at a time.
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Number of bytes that can be read without blocking
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Read a single byte
    ///
    /// Only called after [`available`](Self::available) reported data.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Serial transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Write all bytes to the link
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial port whose line settings can be changed
///
/// Implemented by the port half that owns the UART peripheral.
pub trait SerialSetup {
    /// Error type for configuration
    type Error;

    /// Apply baud rate and framing
    fn configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error>;
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    type Error = T::Error;

    fn available(&mut self) -> Result<usize, Self::Error> {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        (**self).read_byte()
    }
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    type Error = T::Error;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

impl<T: SerialSetup + ?Sized> SerialSetup for &mut T {
    type Error = T::Error;

    fn configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error> {
        (**self).configure(config)
    }
}

/// Serial line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        // Node links run at the classic 9600 8N1
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}
