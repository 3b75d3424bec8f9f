//! Outgoing frame buffer
//!
//! A capacity-bounded buffer that accumulates one request frame and
//! writes it to the transport in one go. The backing allocation is made
//! once and reused for every command.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use crate::error::{PcpError, Result};

/// Accumulates an outgoing frame: opcode (1) + length (4) + payload
///
/// Every write either lands completely or is rejected with
/// [`PcpError::CapacityExceeded`], leaving the buffer untouched.
#[derive(Debug)]
pub struct FrameWriter {
    buf: BytesMut,
    capacity: usize,
}

impl FrameWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written since the last flush
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    fn reserve(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(PcpError::CapacityExceeded { needed, available });
        }
        Ok(())
    }

    pub fn write_opcode(&mut self, opcode: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.put_u8(opcode);
        Ok(())
    }

    /// Big-endian, counts itself plus the payload
    pub fn write_length(&mut self, len: u32) -> Result<()> {
        self.reserve(4)?;
        self.buf.put_u32(len);
        Ok(())
    }

    pub fn write_payload(&mut self, payload: &[u8]) -> Result<()> {
        self.reserve(payload.len())?;
        self.buf.put_slice(payload);
        Ok(())
    }

    /// Payload string followed by a NUL terminator
    pub fn write_cstr(&mut self, s: &str) -> Result<()> {
        self.reserve(s.len() + 1)?;
        self.buf.put_slice(s.as_bytes());
        self.buf.put_u8(0);
        Ok(())
    }

    /// Drop a partially built frame
    pub fn discard(&mut self) {
        self.buf.clear();
    }

    /// Write the pending frame to `writer` and reset
    ///
    /// The buffer is reset even when the write fails; nothing is resent.
    /// The frame goes out through `write_all`, which may take more than one
    /// `write` call on a short write rather than dropping the tail.
    pub fn flush<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        tracing::trace!("-> {:?}", &self.buf[..]);
        let result = writer.write_all(&self.buf).and_then(|_| writer.flush());
        self.buf.clear();
        result?;
        Ok(())
    }

    /// View of the pending frame
    pub fn current_bytes(&self) -> &[u8] {
        &self.buf
    }
}
