//! Client Module
//!
//! The connection state machine and the commands built on it.
//!
//! ## Responsibilities
//! - Own exactly one transport, one frame buffer and one response slot
//! - Run the salted challenge-response handshake
//! - Refuse every other command until the handshake succeeded
//!
//! ## Lifecycle
//! ```text
//!   NotConnected ──authorize()──▶ Connected
//!        │                            │
//!        └──────────close()───────────┴──▶ Closed
//! ```

use std::fmt;
use std::net::TcpStream;
use std::sync::atomic::AtomicBool;

use crate::auth::{derive_credential, Credentials, OsUserSource};
use crate::config::ClientConfig;
use crate::error::{PcpError, Result};
use crate::network::{self, Transport};
use crate::protocol::{
    parse_node_count, FrameWriter, Opcode, ResponseBuffer, ResultStatus, DEFAULT_BUFFER_SIZE,
    LENGTH_SIZE,
};

/// Authorization state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Transport open, handshake not (yet) completed
    NotConnected,
    /// Handshake acknowledged by the backend
    Connected,
    /// Transport released; terminal
    Closed,
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnState::NotConnected => "not connected",
            ConnState::Connected => "connected",
            ConnState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// A PCP client over a single transport
///
/// ## Concurrency
///
/// One request in flight at a time. The frame buffer and the response slot
/// are reused in place by every command, so a `Client` must be owned by a
/// single caller or wrapped in a lock by whoever shares it. All calls block
/// until the transport answers; bound them with transport timeouts.
pub struct Client<T: Transport> {
    transport: T,
    state: ConnState,
    credentials: Credentials,
    frame: FrameWriter,
    response: ResponseBuffer,
}

impl Client<TcpStream> {
    /// Resolve credentials, dial the backend and build an unauthorized client
    ///
    /// `cancel` aborts the dial if raised before the stream is established.
    pub fn connect(config: &ClientConfig, cancel: &AtomicBool) -> Result<Self> {
        config.validate()?;
        let credentials =
            Credentials::resolve(&config.username, &config.password, &OsUserSource)?;
        let stream = network::connect(config, cancel)?;
        Ok(Self::with_buffer_size(stream, credentials, config.buffer_size))
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an established transport using the default buffer size
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self::with_buffer_size(transport, credentials, DEFAULT_BUFFER_SIZE)
    }

    /// Wrap an established transport with `buffer_size`-byte frame and
    /// response buffers
    pub fn with_buffer_size(transport: T, credentials: Credentials, buffer_size: usize) -> Self {
        Self {
            transport,
            state: ConnState::NotConnected,
            credentials,
            frame: FrameWriter::new(buffer_size),
            response: ResponseBuffer::new(buffer_size),
        }
    }

    /// Current authorization state
    pub fn status(&self) -> ConnState {
        self.state
    }

    /// Credentials used by the handshake
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Last reply received; valid until the next command
    pub fn last_response(&self) -> &ResponseBuffer {
        &self.response
    }

    /// Underlying transport
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, e.g. to adjust timeouts between commands
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Run the salt + credential handshake
    ///
    /// A no-op when already connected. On any failure the state stays
    /// `NotConnected`.
    pub fn authorize(&mut self) -> Result<()> {
        match self.state {
            ConnState::Connected => return Ok(()),
            ConnState::Closed => return Err(PcpError::Closed),
            ConnState::NotConnected => {}
        }

        // Round 1: salt
        let status = match self.round_trip(Opcode::Salt, &[]) {
            Ok(status) => status,
            Err(PcpError::BadResponse { opcode, got }) => {
                return Err(PcpError::HandshakeFailed(format!(
                    "unexpected reply 0x{:02x} to salt request 0x{:02x}",
                    got, opcode
                )))
            }
            Err(e) => return Err(e),
        };
        if status != ResultStatus::CommandOk {
            return Err(PcpError::HandshakeFailed(match status {
                ResultStatus::BackendError => self.response.error_message(),
                other => format!("salt request answered with {:?}", other),
            }));
        }

        // Round 2: credentials
        let username = self.credentials.username().to_string();
        let digest = derive_credential(self.response.data(), &username, self.credentials.password());

        let status = self.round_trip(Opcode::Authenticate, &[username.as_str(), digest.as_str()])?;
        if status != ResultStatus::CommandOk {
            let reason = self.response.error_message();
            tracing::warn!("PCP backend rejected user '{}': {}", username, reason);
            return Err(PcpError::CredentialsRejected(reason));
        }

        self.state = ConnState::Connected;
        tracing::debug!("Authorized as '{}'", username);
        Ok(())
    }

    /// Number of backend nodes known to the pool
    ///
    /// Fails with `NotAuthorized` before the handshake, without any I/O.
    pub fn node_count(&mut self) -> Result<usize> {
        self.ensure_authorized()?;

        let status = self.round_trip(Opcode::NodeCount, &[])?;
        if status == ResultStatus::BackendError {
            let reason = self.response.error_message();
            tracing::warn!("Node count failed: {}", reason);
            return Err(PcpError::BackendError(reason));
        }

        let count = parse_node_count(self.response.data())?;
        tracing::debug!("Node count: {}", count);
        Ok(count)
    }

    /// Release the transport; later calls are no-ops
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConnState::Closed {
            return Ok(());
        }
        self.state = ConnState::Closed;
        self.transport.close()?;
        tracing::debug!("Connection closed");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_authorized(&self) -> Result<()> {
        match self.state {
            ConnState::Connected => Ok(()),
            ConnState::NotConnected => Err(PcpError::NotAuthorized),
            ConnState::Closed => Err(PcpError::Closed),
        }
    }

    /// Frame `opcode` with NUL-terminated `fields`, send it, read and classify
    /// the reply
    fn round_trip(&mut self, opcode: Opcode, fields: &[&str]) -> Result<ResultStatus> {
        if let Err(e) = self.write_frame(opcode, fields) {
            self.frame.discard();
            return Err(e);
        }
        self.frame.flush(&mut self.transport)?;

        self.response.fill(&mut self.transport)?;
        self.response.classify(opcode.as_byte())
    }

    fn write_frame(&mut self, opcode: Opcode, fields: &[&str]) -> Result<()> {
        let payload: usize = fields.iter().map(|f| f.len() + 1).sum();
        let len = LENGTH_SIZE + payload;
        let len = u32::try_from(len).map_err(|_| PcpError::CapacityExceeded {
            needed: len,
            available: self.frame.remaining(),
        })?;

        self.frame.write_opcode(opcode.as_byte())?;
        self.frame.write_length(len)?;
        for field in fields {
            self.frame.write_cstr(field)?;
        }
        Ok(())
    }
}

impl<T: Transport> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("credentials", &self.credentials)
            .field("buffer_size", &self.frame.capacity())
            .finish()
    }
}
