//! Payload codec
//!
//! Decoding of the textual payloads that follow the 5-byte response header.
//!
//! ### Node Count (`'l'`)
//! ```text
//! ┌──────────────────────┬──────────────┐
//! │ "CommandComplete" \0 │ count  \0    │
//! └──────────────────────┴──────────────┘
//! ```
//!
//! ### Error / Notice (`'E'` / `'N'`)
//! ```text
//! ┌──────────┬──────────────┬──────────┬──────────────┬─────┐
//! │ type (1) │ text \0      │ type (1) │ text \0      │ ... │
//! └──────────┴──────────────┴──────────┴──────────────┴─────┘
//! ```

use crate::error::{PcpError, Result};

/// Text that opens every command-complete payload
pub const COMMAND_COMPLETE: &str = "CommandComplete";

/// Field type carrying the primary message of an error body
const MESSAGE_FIELD: u8 = b'M';

/// Split a payload on NUL bytes
fn fields(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split(|&b| b == 0)
}

/// Parse a node-count payload into the number of backend nodes
pub fn parse_node_count(data: &[u8]) -> Result<usize> {
    let mut parts = fields(data);

    let marker = parts.next().unwrap_or(&[]);
    if marker != COMMAND_COMPLETE.as_bytes() {
        return Err(PcpError::MalformedResponse(format!(
            "node count: expected '{}', got {:?}",
            COMMAND_COMPLETE,
            String::from_utf8_lossy(marker)
        )));
    }

    let count = parts.next().ok_or_else(|| {
        PcpError::MalformedResponse("node count: missing count field".to_string())
    })?;
    let text = std::str::from_utf8(count).map_err(|_| {
        PcpError::MalformedResponse("node count: count is not UTF-8".to_string())
    })?;

    text.trim().parse::<usize>().map_err(|e| {
        PcpError::MalformedResponse(format!("node count: invalid count {:?}: {}", text, e))
    })
}

/// Decode an error/notice body into `(field type, text)` pairs
///
/// Stops at a zero type byte or at a field missing its terminator.
pub fn parse_error_fields(data: &[u8]) -> Vec<(u8, String)> {
    let mut out = Vec::new();
    let mut rest = data;

    while let Some((&kind, tail)) = rest.split_first() {
        if kind == 0 {
            break;
        }
        let Some(nul) = tail.iter().position(|&b| b == 0) else {
            break;
        };
        out.push((kind, String::from_utf8_lossy(&tail[..nul]).into_owned()));
        rest = &tail[nul + 1..];
    }

    out
}

/// Primary message of an error body, if it carries one
pub fn backend_message(data: &[u8]) -> Option<String> {
    parse_error_fields(data)
        .into_iter()
        .find(|(kind, _)| *kind == MESSAGE_FIELD)
        .map(|(_, text)| text)
}
