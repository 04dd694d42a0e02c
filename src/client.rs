//! Client-side request/reply over a connected UDP socket
//!
//! Replies carry no request id, so a reply that arrives after its request
//! timed out would be read as the answer to the next request. Any datagram
//! already queued when a request is sent is stale and gets discarded first.

use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::AppError;
use crate::handler::MAX_DATAGRAM_SIZE;
use crate::message::Message;

/// Send `message` and wait up to `timeout` for the reply text
pub async fn request(
    socket: &UdpSocket,
    message: &Message,
    timeout: Duration,
) -> Result<String, AppError> {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    let stale = drain(socket, &mut buf);
    if stale > 0 {
        debug!("Discarded {} stale replies", stale);
    }

    socket.send(&message.encode()).await?;

    let len = tokio::time::timeout(timeout, socket.recv(&mut buf))
        .await
        .map_err(|_| AppError::Timeout)??;

    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

/// Discard every datagram already queued on `socket`, returning how many
fn drain(socket: &UdpSocket, buf: &mut [u8]) -> usize {
    let mut count = 0;
    while socket.try_recv(buf).is_ok() {
        count += 1;
    }
    count
}
