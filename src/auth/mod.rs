//! Authentication Module
//!
//! Credential handling for the PCP challenge-response handshake.
//!
//! ## Handshake
//! ```text
//!   client                         backend
//!     │ ── 'M' (salt request) ──────▶ │
//!     │ ◀────────────── 'm' + salt ── │
//!     │ ── 'R' user\0 digest\0 ─────▶ │
//!     │ ◀──────────── 'r' / 'E' ───── │
//! ```
//!
//! The digest is `md5hex(md5hex(md5hex(password) + user) + salt)`.

mod credentials;
mod hash;

pub use credentials::{Credentials, FixedUser, OsUserSource, UserSource};
pub use hash::derive_credential;
