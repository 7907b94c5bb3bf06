//! Serial link driver
//!
//! One [`SerialLink`] per serial port. It owns the receive buffer, a scratch
//! record reused for every parse, and the encoder carrying this node's
//! source id.

use core::fmt;

use tripwire_hal::{SerialRx, SerialSetup, SerialTx};
use tripwire_protocol::{
    EncodeError, LineBuffer, LineEncoder, Message, MessageType, ParseError, StatusState, TripState,
};

use crate::config::NodeConfig;

/// Errors reported by the link
///
/// None of these are fatal: keep polling and the link carries on with the
/// next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Serial port error
    Io(E),
    /// A line outgrew the receive buffer and was dropped
    BufferOverflow { dropped: usize },
    /// A received line was rejected
    Parse(ParseError),
    /// An outbound message could not be encoded
    Encode(EncodeError),
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "serial error: {:?}", e),
            LinkError::BufferOverflow { dropped } => {
                write!(f, "receive buffer overflow ({} bytes dropped)", dropped)
            }
            LinkError::Parse(e) => write!(f, "rejected line: {}", e),
            LinkError::Encode(e) => write!(f, "cannot encode: {}", e),
        }
    }
}

/// Link counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Non-empty lines received
    pub lines: u32,
    /// Lines parsed into a message
    pub parsed: u32,
    /// Lines rejected by the parser
    pub rejected: u32,
    /// Receive buffer overflows
    pub overflows: u32,
    /// Bytes lost to overflows and resync
    pub dropped_bytes: u32,
    /// Lines sent
    pub sent: u32,
}

/// Line protocol driver over a serial receiver/transmitter pair
pub struct SerialLink<R, T> {
    rx: R,
    tx: T,
    config: NodeConfig,
    encoder: LineEncoder,
    buffer: LineBuffer,
    scratch: Message,
    stats: LinkStats,
}

impl<R, T> SerialLink<R, T> {
    /// Create a link over the given port halves
    pub fn new(rx: R, tx: T, config: NodeConfig) -> Self {
        info!("Serial link up as node {}", config.source_id.get());
        Self {
            rx,
            tx,
            config,
            encoder: LineEncoder::new(config.source_id),
            buffer: LineBuffer::new(),
            scratch: Message::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Receive buffer, for inspection
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// The last successfully parsed message (empty after a rejected line)
    pub fn message(&self) -> &Message {
        &self.scratch
    }

    pub fn rx_mut(&mut self) -> &mut R {
        &mut self.rx
    }

    pub fn tx_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Release the port halves
    pub fn into_parts(self) -> (R, T) {
        (self.rx, self.tx)
    }
}

impl<R: SerialSetup, T> SerialLink<R, T> {
    /// Apply the configured baud rate and framing to the port
    ///
    /// Call once after [`new`](Self::new), before the first poll.
    pub fn apply_serial_config(&mut self) -> Result<(), LinkError<R::Error>> {
        let serial = self.config.serial;
        info!("Serial port at {} baud", serial.baudrate);
        self.rx.configure(&serial).map_err(LinkError::Io)
    }
}

impl<R: SerialRx, T> SerialLink<R, T> {
    /// Pull available bytes and return the next complete message
    ///
    /// Returns `Ok(None)` when no complete line is buffered. At most one
    /// line is handled per call; keep calling until `Ok(None)` to drain.
    /// Empty lines (the `\n` of a `\r\n` pair) are skipped.
    pub fn poll(&mut self) -> Result<Option<&Message>, LinkError<R::Error>> {
        let fill = self.buffer.fill_from(&mut self.rx).map_err(LinkError::Io)?;
        if fill.taken() > 0 {
            trace!("RX: {} bytes", fill.taken());
        }
        self.count_dropped(fill.discarded);

        if fill.overflow {
            let dropped = self.buffer.resync();
            self.stats.overflows = self.stats.overflows.saturating_add(1);
            self.count_dropped(dropped);
            warn!("Receive buffer overflow, dropped {} bytes", dropped);
            if self.config.strict_overflow {
                return Err(LinkError::BufferOverflow { dropped });
            }
        }

        loop {
            let scratch = &mut self.scratch;
            let next = self
                .buffer
                .next_line(|line| (!line.is_empty()).then(|| scratch.parse_from(line)));
            let Some(parsed) = next else {
                return Ok(None);
            };
            // Bare terminator (the '\n' of "\r\n"): the last message stays
            let Some(result) = parsed else {
                continue;
            };

            match result {
                Ok(()) => {
                    self.stats.lines = self.stats.lines.saturating_add(1);
                    self.stats.parsed = self.stats.parsed.saturating_add(1);
                    debug!("RX line: {}", self.scratch);
                    return Ok(Some(&self.scratch));
                }
                Err(e) => {
                    self.stats.lines = self.stats.lines.saturating_add(1);
                    self.stats.rejected = self.stats.rejected.saturating_add(1);
                    warn!("Rejected line: {:?}", e);
                    return Err(LinkError::Parse(e));
                }
            }
        }
    }

    fn count_dropped(&mut self, n: usize) {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        self.stats.dropped_bytes = self.stats.dropped_bytes.saturating_add(n);
    }
}

impl<R, T: SerialTx> SerialLink<R, T> {
    /// Send `source,type,name,state[,extra]`
    pub fn send(
        &mut self,
        msg_type: &str,
        name: &str,
        state: &str,
        extra: Option<&str>,
    ) -> Result<(), LinkError<T::Error>> {
        let line = self
            .encoder
            .encode(msg_type, name, state, extra)
            .map_err(LinkError::Encode)?;
        self.write_line(&line)
    }

    /// Send with an integer extra payload
    pub fn send_int(
        &mut self,
        msg_type: &str,
        name: &str,
        state: &str,
        value: i32,
    ) -> Result<(), LinkError<T::Error>> {
        let line = self
            .encoder
            .encode_with_int(msg_type, name, state, value)
            .map_err(LinkError::Encode)?;
        self.write_line(&line)
    }

    /// Send an integer as the state
    pub fn send_int_state(
        &mut self,
        msg_type: &str,
        name: &str,
        value: i32,
    ) -> Result<(), LinkError<T::Error>> {
        let line = self
            .encoder
            .encode_int_state(msg_type, name, value)
            .map_err(LinkError::Encode)?;
        self.write_line(&line)
    }

    /// Report a sensor transition
    pub fn send_trip(
        &mut self,
        kind: MessageType,
        name: &str,
        state: TripState,
    ) -> Result<(), LinkError<T::Error>> {
        self.send(kind.code(), name, state.as_str(), None)
    }

    /// Report panel status
    pub fn send_status(
        &mut self,
        name: &str,
        status: StatusState,
    ) -> Result<(), LinkError<T::Error>> {
        self.send(MessageType::Status.code(), name, status.as_str(), None)
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), LinkError<T::Error>> {
        self.tx.write_all(line).map_err(LinkError::Io)?;
        self.tx.flush().map_err(LinkError::Io)?;
        self.stats.sent = self.stats.sent.saturating_add(1);
        trace!("TX: {} bytes", line.len());
        Ok(())
    }
}
