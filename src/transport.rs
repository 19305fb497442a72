//! Stream Transport Abstraction

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::SocksError;
use crate::Result;

/// A connected, bidirectional byte stream with an adjustable read timeout.
///
/// The handshake is written against this trait rather than `TcpStream`
/// directly so it can be exercised against an in-memory transport in tests.
/// A read timeout of `None` means the stream blocks indefinitely.
pub trait Transport: Read + Write {
    fn read_timeout(&self) -> std::io::Result<Option<Duration>>;
    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()>;
}

impl Transport for TcpStream {
    fn read_timeout(&self) -> std::io::Result<Option<Duration>> {
        TcpStream::read_timeout(self)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> std::io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// Reads exactly `buf.len()` bytes from the stream.
///
/// A clean end of stream before the buffer is full is reported as
/// `TruncatedStream`; any other read failure, including a timeout, is
/// surfaced as `Io`.
pub fn read_fully<T: Read + ?Sized>(stream: &mut T, buf: &mut [u8]) -> Result<()> {
    let mut offset = 0;
    while offset < buf.len() {
        let read = stream.read(&mut buf[offset..])?;
        if read == 0 {
            return Err(SocksError::TruncatedStream);
        }
        offset += read;
    }
    Ok(())
}
