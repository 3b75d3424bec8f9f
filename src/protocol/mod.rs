//! Protocol Module
//!
//! Wire format of the PCP control protocol.
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! `Len` is big-endian and counts itself: `4 + payload`.
//!
//! ### Requests
//! - 'M': salt request      - Payload: empty
//! - 'R': credentials       - Payload: user \0 digest \0
//! - 'L': node count        - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Code (1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Response Codes
//! - echo of the request opcode (any case): OK
//! - 'E' / 'N': backend error / notice
//! - 'c' / 'd' / 'a' / 'z': command complete

mod codec;
mod frame;
mod opcode;
mod response;

pub use codec::{backend_message, parse_error_fields, parse_node_count, COMMAND_COMPLETE};
pub use frame::FrameWriter;
pub use opcode::{
    expects_upper_echo, is_complete_marker, is_error_marker, Opcode, COMPLETE_MARKERS,
    ERROR_MARKER, NOTICE_MARKER, UPPER_ECHO_OPCODES,
};
pub use response::{ResponseBuffer, ResultStatus};

/// Header size: 1 byte opcode/code + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Size of the length field, which counts itself
pub const LENGTH_SIZE: usize = 4;

/// Default capacity of the frame and response buffers
pub const DEFAULT_BUFFER_SIZE: usize = 256;
