//! Transport abstraction
//!
//! Any reliable, ordered byte stream the client can own.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Byte stream owned by a single client
pub trait Transport: Read + Write {
    /// Release the stream; a stream that is already gone counts as closed
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
