//! Response buffer and classifier
//!
//! One reusable slot holds the most recent backend reply. The slot is
//! overwritten by every read, so its status and payload are only valid
//! until the next command.

use std::io::{self, Read};

use crate::error::{PcpError, Result};
use super::codec::backend_message;
use super::opcode::{expects_upper_echo, is_complete_marker, is_error_marker};
use super::HEADER_SIZE;

/// Outcome of classifying a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// Nothing read yet, or read but not classified
    Incomplete,
    CommandOk,
    CommandComplete,
    BackendError,
    BadResponse,
}

/// Fixed-capacity buffer for the last reply
#[derive(Debug)]
pub struct ResponseBuffer {
    buf: Box<[u8]>,
    end: usize,
    status: ResultStatus,
}

impl ResponseBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            end: 0,
            status: ResultStatus::Incomplete,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Overwrite the slot with a single read from `reader`
    ///
    /// The first read is taken to be the whole reply; a short read is not
    /// topped up.
    pub fn fill<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        self.end = 0;
        self.status = ResultStatus::Incomplete;

        let n = reader.read(&mut self.buf)?;
        if n == 0 {
            return Err(PcpError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "backend closed the connection",
            )));
        }
        self.end = n;
        tracing::trace!("<- {:?}", self.bytes());
        Ok(n)
    }

    /// Everything the last read produced
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    /// Leading response code
    pub fn code(&self) -> Option<u8> {
        self.bytes().first().copied()
    }

    /// Length field of the header, if the read covered it
    pub fn declared_len(&self) -> Option<u32> {
        let header = self.bytes().get(1..HEADER_SIZE)?;
        Some(u32::from_be_bytes([header[0], header[1], header[2], header[3]]))
    }

    /// Payload after the 5-byte header
    pub fn data(&self) -> &[u8] {
        self.bytes().get(HEADER_SIZE..).unwrap_or(&[])
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::CommandOk
    }

    /// Human-readable text of a backend error reply
    pub fn error_message(&self) -> String {
        backend_message(self.data())
            .unwrap_or_else(|| "backend returned an error response".to_string())
    }

    /// Label the slot's contents as the reply to `opcode`
    ///
    /// Unrecognized replies are marked [`ResultStatus::BadResponse`] and
    /// also returned as an error.
    pub fn classify(&mut self, opcode: u8) -> Result<ResultStatus> {
        let code = self.code().unwrap_or(0);

        self.status = if expects_upper_echo(opcode) && code.to_ascii_uppercase() == opcode {
            ResultStatus::CommandOk
        } else if is_error_marker(code) {
            ResultStatus::BackendError
        } else if is_complete_marker(code) {
            ResultStatus::CommandComplete
        } else {
            ResultStatus::BadResponse
        };

        if self.status == ResultStatus::BadResponse {
            return Err(PcpError::BadResponse { opcode, got: code });
        }
        Ok(self.status)
    }
}
