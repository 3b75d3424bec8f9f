//! Credential source
//!
//! Isolates the OS account lookup so the handshake never touches
//! process-global identity state directly.

use std::env;

use crate::error::{PcpError, Result};

/// Supplies the default username when none is configured
pub trait UserSource {
    fn current_user(&self) -> Result<String>;
}

/// Looks up the invoking OS account
///
/// Asks the user database for the name of the current uid. The `USER`,
/// `LOGNAME` and `USERNAME` variables are consulted only when that fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsUserSource;

impl OsUserSource {
    const VARS: [&'static str; 3] = ["USER", "LOGNAME", "USERNAME"];

    /// Largest passwd scratch buffer tried before giving up
    #[cfg(unix)]
    const MAX_PASSWD_BUF: usize = 1 << 20;

    /// Login name of the current uid from the user database
    #[cfg(unix)]
    pub fn account_name() -> Option<String> {
        use std::ffi::CStr;

        let uid = unsafe { libc::getuid() };
        let mut buf: Vec<libc::c_char> = vec![0; 1024];

        loop {
            let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
            let mut found: *mut libc::passwd = std::ptr::null_mut();
            let rc = unsafe {
                libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut found)
            };

            if rc == libc::ERANGE && buf.len() < Self::MAX_PASSWD_BUF {
                let len = buf.len() * 2;
                buf.resize(len, 0);
                continue;
            }
            if rc != 0 || found.is_null() || pwd.pw_name.is_null() {
                tracing::debug!("No passwd entry for uid {} (rc={})", uid, rc);
                return None;
            }

            // pw_name points into `buf`, which outlives this borrow
            let name = unsafe { CStr::from_ptr(pwd.pw_name) }
                .to_string_lossy()
                .into_owned();
            return (!name.is_empty()).then_some(name);
        }
    }

    #[cfg(not(unix))]
    pub fn account_name() -> Option<String> {
        None
    }

    fn from_env() -> Option<String> {
        Self::VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|name| !name.is_empty())
    }
}

impl UserSource for OsUserSource {
    fn current_user(&self) -> Result<String> {
        Self::account_name()
            .or_else(Self::from_env)
            .ok_or_else(|| PcpError::Config("failed to get default user".to_string()))
    }
}

/// Always answers with the same name
#[derive(Debug, Clone)]
pub struct FixedUser(pub String);

impl UserSource for FixedUser {
    fn current_user(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Username and password used for the handshake
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build credentials, asking `source` for the user when `username` is empty
    pub fn resolve(username: &str, password: &str, source: &dyn UserSource) -> Result<Self> {
        let username = if username.is_empty() {
            let user = source.current_user()?;
            tracing::debug!("No PCP user configured, falling back to '{}'", user);
            user
        } else {
            username.to_string()
        };
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
