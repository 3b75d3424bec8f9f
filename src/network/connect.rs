//! Dialer
//!
//! Opens the TCP stream to the backend.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{PcpError, Result};

/// Dial `config.addr`, giving up early once `cancel` is raised
///
/// Each resolved address is tried in turn. The flag is checked before
/// every attempt and once more after a successful dial.
pub fn connect(config: &ClientConfig, cancel: &AtomicBool) -> Result<TcpStream> {
    if cancel.load(Ordering::Relaxed) {
        return Err(PcpError::Cancelled);
    }

    let addrs: Vec<SocketAddr> = config.addr.to_socket_addrs()?.collect();
    let mut last_err = None;

    for addr in addrs {
        if cancel.load(Ordering::Relaxed) {
            return Err(PcpError::Cancelled);
        }

        let attempt = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(addr)
        };

        match attempt {
            Ok(stream) => {
                if cancel.load(Ordering::Relaxed) {
                    return Err(PcpError::Cancelled);
                }
                configure(&stream, config)?;
                tracing::debug!("Connected to PCP backend at {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Dial {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) => PcpError::Io(e),
        None => PcpError::Config(format!("address '{}' resolved to nothing", config.addr)),
    })
}

/// Disable Nagle and apply the configured timeouts
fn configure(stream: &TcpStream, config: &ClientConfig) -> Result<()> {
    // Frames are tiny and strictly request/response
    stream.set_nodelay(true)?;

    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    Ok(())
}
