//! PCP CLI Client
//!
//! Authorizes against a PCP backend and prints its node count.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use pcp_client::{Client, ClientConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// PCP CLI
#[derive(Parser, Debug)]
#[command(name = "pcp-cli")]
#[command(about = "Query a PCP backend")]
#[command(version)]
struct Args {
    /// Address of the PCP backend (host:port)
    #[arg(short, long, default_value = "pool:9898")]
    addr: String,

    /// PCP user (empty = current OS user)
    #[arg(short, long, default_value = "pgpool")]
    username: String,

    /// PCP password
    #[arg(short, long, default_value = "password")]
    password: String,

    /// Frame and response buffer size in bytes
    #[arg(short, long, default_value = "256")]
    buffer_size: usize,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pcp_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("pcp-cli v{}", pcp_client::VERSION);
    tracing::info!("Backend address: {}", args.addr);

    let config = ClientConfig::builder()
        .addr(&args.addr)
        .username(&args.username)
        .password(&args.password)
        .buffer_size(args.buffer_size)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    // First Ctrl+C aborts a pending dial; once the flag is set, Ctrl+C exits
    let cancel = Arc::new(AtomicBool::new(false));
    if let Err(e) = install_interrupt_handler(&cancel) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let mut client = match Client::connect(&config, &cancel) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Could not open connection to PCP backend: {}", e);
            std::process::exit(1);
        }
    };

    // Past the dial nothing polls the flag, so arm the shutdown path
    cancel.store(true, Ordering::Relaxed);

    let result = client.authorize().and_then(|_| client.node_count());

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }

    match result {
        Ok(count) => println!("{}", count),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Exit status for termination by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Route SIGINT to `flag`, exiting instead when the flag is already set
///
/// The conditional shutdown is registered first so it sees the flag before
/// the same signal raises it.
fn install_interrupt_handler(flag: &Arc<AtomicBool>) -> io::Result<()> {
    use signal_hook::consts::SIGINT;

    signal_hook::flag::register_conditional_shutdown(SIGINT, INTERRUPTED_EXIT_CODE, Arc::clone(flag))?;
    signal_hook::flag::register(SIGINT, Arc::clone(flag))?;
    Ok(())
}
