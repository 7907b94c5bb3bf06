//! Receive buffer for the line protocol.
//!
//! Bytes are appended as they arrive from the serial port. Once a
//! terminator (`\n` or `\r`) is present the line in front of it is handed
//! out and compacted away, shifting whatever follows to the front.
//!
//! The buffer never grows past [`MAX_SERIAL_IN`]. A buffer that fills up
//! without holding a terminator is *overflowed*: the line in it can never
//! complete. [`LineBuffer::resync`] recovers by dropping the fragment and
//! discarding input up to the next terminator.

use heapless::Vec;
use tripwire_hal::SerialRx;

use crate::message::{is_terminator, MAX_SERIAL_IN};

/// Outcome of offering one byte to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Accept {
    /// Byte appended
    Stored,
    /// Byte swallowed while resynchronizing
    Discarded,
    /// Buffer full, byte not taken
    Full,
}

/// Summary of one fill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fill {
    /// Bytes appended to the buffer
    pub stored: usize,
    /// Bytes swallowed while resynchronizing
    pub discarded: usize,
    /// Buffer is full and holds no terminator
    pub overflow: bool,
}

impl Fill {
    /// Bytes taken from the source
    pub fn taken(&self) -> usize {
        self.stored + self.discarded
    }
}

/// Fixed-capacity line accumulator
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    data: Vec<u8, MAX_SERIAL_IN>,
    resyncing: bool,
}

impl LineBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            resyncing: false,
        }
    }

    /// Buffered bytes, oldest first
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        MAX_SERIAL_IN
    }

    /// Free space left
    pub fn remaining(&self) -> usize {
        MAX_SERIAL_IN - self.data.len()
    }

    pub fn is_full(&self) -> bool {
        self.data.is_full()
    }

    /// Returns true while input is being skipped after an overflow
    pub fn is_resyncing(&self) -> bool {
        self.resyncing
    }

    /// Returns true if the buffer is full and no line can complete
    pub fn is_overflowed(&self) -> bool {
        self.is_full() && self.find_terminator().is_none()
    }

    /// Offer one byte
    pub fn push(&mut self, byte: u8) -> Accept {
        if self.resyncing {
            // The terminator ending the lost line is swallowed too
            if is_terminator(byte) {
                self.resyncing = false;
            }
            return Accept::Discarded;
        }

        match self.data.push(byte) {
            Ok(()) => Accept::Stored,
            Err(_) => Accept::Full,
        }
    }

    /// Append bytes from a slice until the buffer is full
    ///
    /// Bytes past `fill.taken()` were refused.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Fill {
        let mut fill = Fill::default();
        for &byte in bytes {
            match self.push(byte) {
                Accept::Stored => fill.stored += 1,
                Accept::Discarded => fill.discarded += 1,
                Accept::Full => break,
            }
        }
        fill.overflow = self.is_overflowed();
        fill
    }

    /// Read whatever the source has available, up to the free space
    ///
    /// Never blocks. Bytes that do not fit stay in the source.
    pub fn fill_from<R: SerialRx>(&mut self, rx: &mut R) -> Result<Fill, R::Error> {
        let mut fill = Fill::default();
        while !self.is_full() && rx.available()? > 0 {
            let byte = rx.read_byte()?;
            match self.push(byte) {
                Accept::Stored => fill.stored += 1,
                Accept::Discarded => fill.discarded += 1,
                Accept::Full => break,
            }
        }
        fill.overflow = self.is_overflowed();
        Ok(fill)
    }

    /// Index of the first terminator, if any
    pub fn find_terminator(&self) -> Option<usize> {
        self.data.iter().position(|&b| is_terminator(b))
    }

    /// Remove the first `n` bytes, shifting the rest to the front
    ///
    /// `n` larger than the buffered length removes everything.
    pub fn consume(&mut self, n: usize) {
        let len = self.data.len();
        let n = n.min(len);
        self.data.copy_within(n.., 0);
        self.data.truncate(len - n);
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Drop the buffered fragment and skip input up to the next terminator
    ///
    /// Returns the number of buffered bytes dropped.
    pub fn resync(&mut self) -> usize {
        let dropped = self.data.len();
        self.data.clear();
        self.resyncing = true;
        dropped
    }

    /// Hand the next complete line to `f`, then compact it away
    ///
    /// The line excludes its terminator. The line and terminator are
    /// removed whatever `f` makes of them, so a bad line cannot wedge the
    /// buffer. Returns `None` when no terminator is buffered.
    pub fn next_line<T, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&[u8]) -> T,
    {
        let end = self.find_terminator()?;
        let out = f(&self.data[..end]);
        self.consume(end + 1);
        Some(out)
    }
}
