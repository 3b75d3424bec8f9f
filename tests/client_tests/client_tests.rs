//! Tests for Client
//!
//! These tests verify:
//! - The two-round authentication handshake on the wire
//! - State gating of commands
//! - Node count parsing end to end
//! - Close semantics

#[path = "../common/mod.rs"]
mod common;

use common::{error_body, node_count_body, reply, ScriptedTransport};
use pcp_client::auth::derive_credential;
use pcp_client::protocol::ResultStatus;
use pcp_client::{Client, ConnState, Credentials, PcpError};

const USERNAME: &str = "pass";
const PASSWORD: &str = "pass";
const SALT: &[u8] = &[0x9a, 0x01, 0x7f, 0x00];

// =============================================================================
// Helper Functions
// =============================================================================

fn make_client(replies: Vec<Vec<u8>>) -> Client<ScriptedTransport> {
    Client::new(
        ScriptedTransport::with_replies(replies),
        Credentials::new(USERNAME, PASSWORD),
    )
}

fn handshake_replies() -> Vec<Vec<u8>> {
    vec![reply(b'm', SALT), reply(b'r', b"AuthenticationOK\0")]
}

fn authorized_client(mut extra: Vec<Vec<u8>>) -> Client<ScriptedTransport> {
    let mut replies = handshake_replies();
    replies.append(&mut extra);
    let mut client = make_client(replies);
    client.authorize().unwrap();
    client
}

fn credentials_frame(salt: &[u8]) -> Vec<u8> {
    let digest = derive_credential(salt, USERNAME, PASSWORD);
    let mut frame = vec![b'R'];
    frame.extend_from_slice(&((6 + USERNAME.len() + digest.len()) as u32).to_be_bytes());
    frame.extend_from_slice(USERNAME.as_bytes());
    frame.push(0);
    frame.extend_from_slice(digest.as_bytes());
    frame.push(0);
    frame
}

// =============================================================================
// Authorization Tests
// =============================================================================

#[test]
fn test_new_client_not_connected() {
    let client = make_client(vec![]);
    assert_eq!(client.status(), ConnState::NotConnected);
}

#[test]
fn test_authorize_sends_salt_request_first() {
    // No replies: the handshake fails after the first write
    let mut client = make_client(vec![]);
    assert!(client.authorize().is_err());

    assert_eq!(client.get_ref().writes.len(), 1);
    assert_eq!(client.get_ref().writes[0], vec![0x4D, 0x00, 0x00, 0x00, 0x04]);
    assert_eq!(client.status(), ConnState::NotConnected);
}

#[test]
fn test_authorize_full_handshake() {
    let mut client = make_client(handshake_replies());
    client.authorize().unwrap();

    let writes = &client.get_ref().writes;
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], vec![b'M', 0, 0, 0, 4]);
    assert_eq!(writes[1], credentials_frame(SALT));
    assert_eq!(client.status(), ConnState::Connected);
}

#[test]
fn test_authorize_accepts_uppercase_echo() {
    let mut client = make_client(vec![reply(b'M', SALT), reply(b'R', b"")]);
    client.authorize().unwrap();
    assert_eq!(client.status(), ConnState::Connected);
}

#[test]
fn test_authorize_is_idempotent() {
    let mut client = make_client(handshake_replies());
    client.authorize().unwrap();
    client.authorize().unwrap();

    assert_eq!(client.get_ref().writes.len(), 2);
    assert_eq!(client.status(), ConnState::Connected);
}

#[test]
fn test_salt_error_fails_handshake() {
    let mut client = make_client(vec![reply(b'E', &error_body("pcp disabled"))]);
    let err = client.authorize().unwrap_err();

    match err {
        PcpError::HandshakeFailed(msg) => assert_eq!(msg, "pcp disabled"),
        other => panic!("Expected HandshakeFailed, got {:?}", other),
    }
    assert_eq!(client.get_ref().writes.len(), 1);
    assert_eq!(client.status(), ConnState::NotConnected);
}

#[test]
fn test_salt_bad_response_fails_handshake() {
    let mut client = make_client(vec![reply(b'x', b"")]);
    assert!(matches!(
        client.authorize(),
        Err(PcpError::HandshakeFailed(_))
    ));
}

#[test]
fn test_rejected_credentials() {
    let mut client = make_client(vec![
        reply(b'm', SALT),
        reply(b'E', &error_body("authentication failed")),
    ]);
    let err = client.authorize().unwrap_err();

    match err {
        PcpError::CredentialsRejected(msg) => assert_eq!(msg, "authentication failed"),
        other => panic!("Expected CredentialsRejected, got {:?}", other),
    }
    assert_eq!(client.status(), ConnState::NotConnected);
}

#[test]
fn test_transport_error_aborts_handshake() {
    let mut transport = ScriptedTransport::with_replies(handshake_replies());
    transport.fail_writes = true;
    let mut client = Client::new(transport, Credentials::new(USERNAME, PASSWORD));

    assert!(matches!(client.authorize(), Err(PcpError::Io(_))));
    assert_eq!(client.status(), ConnState::NotConnected);
}

#[test]
fn test_credentials_too_large_for_buffer() {
    let transport = ScriptedTransport::with_replies(vec![reply(b'm', SALT)]);
    let mut client = Client::with_buffer_size(transport, Credentials::new("u".repeat(64), "p"), 64);

    let err = client.authorize().unwrap_err();
    assert!(matches!(err, PcpError::CapacityExceeded { .. }));
    // Only the salt request made it out
    assert_eq!(client.get_ref().writes.len(), 1);
}

#[test]
fn test_retry_after_failed_handshake() {
    let mut client = make_client(vec![
        reply(b'm', SALT),
        reply(b'E', &error_body("try again")),
        reply(b'm', SALT),
        reply(b'r', b""),
    ]);

    assert!(client.authorize().is_err());
    client.authorize().unwrap();
    assert_eq!(client.status(), ConnState::Connected);
    assert_eq!(client.get_ref().writes.len(), 4);
}

// =============================================================================
// Node Count Tests
// =============================================================================

#[test]
fn test_node_count_requires_authorization() {
    let mut client = make_client(vec![reply(b'l', &node_count_body("2"))]);

    assert!(matches!(client.node_count(), Err(PcpError::NotAuthorized)));
    assert!(client.get_ref().writes.is_empty());
}

#[test]
fn test_node_count() {
    let mut client = authorized_client(vec![reply(b'l', &node_count_body("42"))]);

    assert_eq!(client.node_count().unwrap(), 42);
    assert_eq!(client.get_ref().writes.last().unwrap(), &vec![b'L', 0, 0, 0, 4]);
}

#[test]
fn test_node_count_wrong_marker() {
    let mut body = b"Something\0".to_vec();
    body.extend_from_slice(b"3\0");
    let mut client = authorized_client(vec![reply(b'l', &body)]);

    assert!(matches!(
        client.node_count(),
        Err(PcpError::MalformedResponse(_))
    ));
}

#[test]
fn test_node_count_non_numeric() {
    let mut client = authorized_client(vec![reply(b'l', &node_count_body("many"))]);
    assert!(matches!(
        client.node_count(),
        Err(PcpError::MalformedResponse(_))
    ));
}

#[test]
fn test_node_count_backend_error() {
    let mut client = authorized_client(vec![reply(b'E', &error_body("no nodes"))]);

    match client.node_count().unwrap_err() {
        PcpError::BackendError(msg) => assert_eq!(msg, "no nodes"),
        other => panic!("Expected BackendError, got {:?}", other),
    }
    // A backend error does not drop authorization
    assert_eq!(client.status(), ConnState::Connected);
}

#[test]
fn test_node_count_bad_response() {
    let mut client = authorized_client(vec![reply(b'q', b"")]);
    assert!(matches!(
        client.node_count(),
        Err(PcpError::BadResponse { opcode: b'L', got: b'q' })
    ));
}

#[test]
fn test_repeated_node_count_reuses_buffers() {
    let mut client = authorized_client(vec![
        reply(b'l', &node_count_body("1")),
        reply(b'l', &node_count_body("5")),
    ]);

    assert_eq!(client.node_count().unwrap(), 1);
    assert_eq!(client.node_count().unwrap(), 5);
    assert_eq!(client.get_ref().writes.len(), 4);
}

#[test]
fn test_last_response_holds_node_count_reply() {
    let mut client = authorized_client(vec![reply(b'l', &node_count_body("7"))]);
    client.node_count().unwrap();

    let last = client.last_response();
    assert_eq!(last.status(), ResultStatus::CommandOk);
    assert_eq!(last.code(), Some(b'l'));
    assert_eq!(last.data(), &node_count_body("7")[..]);
}

#[test]
fn test_replies_scripted_after_construction() {
    let mut client = make_client(vec![]);
    for r in handshake_replies() {
        client.get_mut().push_reply(r);
    }
    client.get_mut().push_reply(reply(b'l', &node_count_body("2")));

    client.authorize().unwrap();
    assert_eq!(client.node_count().unwrap(), 2);
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let mut client = make_client(vec![]);
    client.close().unwrap();
    client.close().unwrap();

    assert_eq!(client.status(), ConnState::Closed);
    assert_eq!(client.get_ref().closed, 1);
}

#[test]
fn test_commands_after_close() {
    let mut client = authorized_client(vec![reply(b'l', &node_count_body("1"))]);
    client.close().unwrap();

    assert!(matches!(client.node_count(), Err(PcpError::Closed)));
    assert!(matches!(client.authorize(), Err(PcpError::Closed)));
    assert_eq!(client.get_ref().writes.len(), 2);
}
