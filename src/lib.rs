//! # pcp-client
//!
//! A blocking client for the PCP control protocol of a connection-pooling
//! backend:
//! - Fixed-capacity frame buffer for outgoing commands
//! - Table-driven classification of backend replies
//! - Salted MD5 challenge-response authentication
//! - Commands gated on the authorization state
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │        (state machine: authorize / node_count / close)       │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   FrameWriter   │                │ ResponseBuffer  │
//!   │ (opcode+len+..) │                │   (classify)    │
//!   └────────┬────────┘                └────────▲────────┘
//!            │ flush                            │ fill
//!            ▼                                  │
//!   ┌─────────────────────────────────────────────────────┐
//!   │                  Transport (TCP)                     │
//!   └─────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod auth;
pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PcpError, Result};
pub use config::ClientConfig;
pub use auth::Credentials;
pub use client::{Client, ConnState};
pub use network::Transport;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pcp-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
