//! SIMP client - interactive prompt
//!
//! Asks for a username, then sends every line as a chat message and prints
//! the server's reply. `quit` or Ctrl-C sends a FIN before exiting.

use std::env;
use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::net::UdpSocket;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use simp::client::request;
use simp::{config, AppError, CliArgs, Message, Operation};

/// How long to wait for a server reply
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("simp=warn")),
        )
        .init();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.version {
        println!("simp-client {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let config = config::load(&args)?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect((config.host.as_str(), config.port)).await?;
    debug!("Client bound to {}, server {}", socket.local_addr()?, config.addr());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(username) = prompt(&mut lines, "Enter your username: ").await? else {
        return Ok(());
    };
    let username = username.trim().to_string();

    loop {
        tokio::select! {
            line = prompt(&mut lines, "> ") => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                let message = Message::chat(line, &username, false)?;
                match request(&socket, &message, REPLY_TIMEOUT).await {
                    Ok(reply) => println!("{}", reply),
                    Err(e) => warn!("No reply: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    println!("Logging out...");
    let fin = Message::control(&username, Operation::Fin, None)?;
    match request(&socket, &fin, REPLY_TIMEOUT).await {
        Ok(reply) => println!("{}", reply),
        Err(e) => warn!("No reply to disconnect: {}", e),
    }

    Ok(())
}

/// Print `text` and read one line, `None` on end of input
async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    text: &str,
) -> Result<Option<String>, AppError> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
