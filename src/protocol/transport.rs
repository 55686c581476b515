//! Transport abstraction: the byte-oriented serial link to the host.
//!
//! Concrete implementations:
//! - ESP-IDF UART (USB-serial bridge) in [`adapters::uart`](crate::adapters::uart)
//! - in-memory loopback for host tests (same module, host build)
//!
//! The dispatcher is generic over `Transport`, so swapping the link (USB
//! CDC, a second UART) requires no change to the protocol logic.

/// Consecutive zero-length writes after which `write_all` gives up.
pub const MAX_STALLED_WRITES: u32 = 8;

/// Failure of [`Transport::write_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError<E> {
    /// The underlying `write` or `flush` failed.
    Link(E),
    /// `write` made no progress `MAX_STALLED_WRITES` times in a row.
    Stalled,
}

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write all of `data`, retrying short writes, then flush.
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), WriteError<Self::Error>> {
        let mut stalled = 0;
        while !data.is_empty() {
            let n = self.write(data).map_err(WriteError::Link)?;
            if n == 0 {
                stalled += 1;
                if stalled >= MAX_STALLED_WRITES {
                    return Err(WriteError::Stalled);
                }
                std::thread::yield_now();
                continue;
            }
            stalled = 0;
            data = &data[n.min(data.len())..];
        }
        self.flush().map_err(WriteError::Link)
    }
}
