//! SIMP server - Entry Point
//!
//! Binds the UDP socket, starts the SessionServer actor and serves datagrams
//! until Ctrl-C.

use std::env;

use tokio::net::UdpSocket;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use simp::{config, handler, server, CliArgs};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=simp=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("simp=info")),
        )
        .init();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.version {
        println!("simp-server {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let config = config::load(&args)?;

    let socket = match UdpSocket::bind((config.host.as_str(), config.port)).await {
        Ok(socket) => socket,
        Err(e) => {
            error!("Failed to bind {}: {}", config.addr(), e);
            return Err(e.into());
        }
    };
    info!("SIMP server listening on {}", socket.local_addr()?);

    let handle = server::spawn(CHANNEL_BUFFER_SIZE);

    tokio::select! {
        result = handler::serve(socket, handle) => {
            if let Err(e) = &result {
                error!("Datagram loop stopped: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Exiting...");
        }
    }

    Ok(())
}
