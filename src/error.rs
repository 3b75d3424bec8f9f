//! Error types for the PCP client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PcpError
pub type Result<T> = std::result::Result<T, PcpError>;

/// Unified error type for PCP client operations
#[derive(Debug, Error)]
pub enum PcpError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connect cancelled")]
    Cancelled,

    #[error("Connection closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("No space left in frame buffer: need {needed} bytes, {available} available")]
    CapacityExceeded { needed: usize, available: usize },

    // -------------------------------------------------------------------------
    // Authentication Errors
    // -------------------------------------------------------------------------
    #[error("Authentication handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Backend rejected credentials: {0}")]
    CredentialsRejected(String),

    #[error("Client not authorized")]
    NotAuthorized,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Bad response to opcode 0x{opcode:02x}: leading byte 0x{got:02x}")]
    BadResponse { opcode: u8, got: u8 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
