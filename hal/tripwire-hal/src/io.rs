//! Adapter for `embedded-io` ports
//!
//! Chip HALs (embassy, esp-hal, linux-embedded-hal) expose their UARTs
//! through the `embedded-io` traits. Wrapping one in [`EmbeddedIoPort`]
//! makes it usable as a [`SerialRx`] / [`SerialTx`].

use embedded_io::{ErrorType, Read, ReadReady, Write};

use crate::uart::{SerialRx, SerialTx};

/// Errors raised by an [`EmbeddedIoPort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError<E> {
    /// Underlying port error
    Io(E),
    /// Port reported ready but returned no data
    Eof,
}

/// Serial port backed by an `embedded-io` implementation
pub struct EmbeddedIoPort<T> {
    inner: T,
}

impl<T> EmbeddedIoPort<T> {
    /// Wrap an `embedded-io` port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get access to the wrapped port
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get mutable access to the wrapped port
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the port
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> SerialRx for EmbeddedIoPort<T> {
    type Error = PortError<<T as ErrorType>::Error>;

    fn available(&mut self) -> Result<usize, Self::Error> {
        // embedded-io only reports readiness, not a count
        let ready = self.inner.read_ready().map_err(PortError::Io)?;
        Ok(usize::from(ready))
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf).map_err(PortError::Io)? {
            0 => Err(PortError::Eof),
            _ => Ok(buf[0]),
        }
    }
}

impl<T: Write> SerialTx for EmbeddedIoPort<T> {
    type Error = PortError<<T as ErrorType>::Error>;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).map_err(PortError::Io)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(PortError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// In-memory port: fixed input, bounded output
    struct MemPort {
        input: &'static [u8],
        pos: usize,
        out: [u8; 32],
        out_len: usize,
        flushed: bool,
    }

    impl MemPort {
        fn new(input: &'static [u8]) -> Self {
            Self {
                input,
                pos: 0,
                out: [0; 32],
                out_len: 0,
                flushed: false,
            }
        }
    }

    impl ErrorType for MemPort {
        type Error = Infallible;
    }

    impl ReadReady for MemPort {
        fn read_ready(&mut self) -> Result<bool, Infallible> {
            Ok(self.pos < self.input.len())
        }
    }

    impl Read for MemPort {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
            let rest = &self.input[self.pos..];
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for MemPort {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            let n = buf.len().min(self.out.len() - self.out_len);
            self.out[self.out_len..self.out_len + n].copy_from_slice(&buf[..n]);
            self.out_len += n;
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_read_until_not_ready() {
        let mut port = EmbeddedIoPort::new(MemPort::new(b"7,2\n"));
        let mut got = [0u8; 4];
        let mut n = 0;
        while port.available().unwrap() > 0 {
            got[n] = port.read_byte().unwrap();
            n += 1;
        }
        assert_eq!(&got[..n], b"7,2\n");
        assert_eq!(port.available(), Ok(0));
    }

    #[test]
    fn test_read_past_end_is_eof() {
        let mut port = EmbeddedIoPort::new(MemPort::new(b""));
        assert_eq!(port.read_byte(), Err(PortError::Eof));
    }

    #[test]
    fn test_write_and_flush() {
        let mut port = EmbeddedIoPort::new(MemPort::new(b""));
        port.write_all(b"5,100,Panel,Armed\n").unwrap();
        SerialTx::flush(&mut port).unwrap();

        let inner = port.into_inner();
        assert_eq!(&inner.out[..inner.out_len], b"5,100,Panel,Armed\n");
        assert!(inner.flushed);
    }
}
