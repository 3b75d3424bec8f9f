//! Network Module
//!
//! TCP dialing and the byte-stream seam the client runs over.
//!
//! ## Architecture
//! - One blocking stream per client
//! - Cancellation is observed only while dialing
//! - Timeouts belong to the stream, not to the protocol layer

mod connect;
mod transport;

pub use connect::connect;
pub use transport::Transport;
