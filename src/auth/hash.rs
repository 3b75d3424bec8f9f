//! Salted credential digest
//!
//! Three MD5 rounds, each hex-encoded before feeding the next. Backends
//! recompute the same chain, so the byte layout here is fixed.

/// Hex-encoded MD5 of `input`
fn md5_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(md5::compute(input).0)
}

/// Derive the credential digest sent in place of the plaintext password
///
/// `salt` is appended as raw bytes in the last round. An empty salt is
/// valid input and yields a different digest than any real salt.
pub fn derive_credential(salt: &[u8], username: &str, password: &str) -> String {
    let pass = md5_hex(password);
    let crypt = md5_hex(format!("{}{}", pass, username));

    let mut salted = Vec::with_capacity(crypt.len() + salt.len());
    salted.extend_from_slice(crypt.as_bytes());
    salted.extend_from_slice(salt);

    md5_hex(salted)
}
