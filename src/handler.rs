//! UDP datagram handler
//!
//! Receives datagrams, decodes them as SIMP messages, forwards them to the
//! SessionServer and sends the reply text back to the source address.
//! A datagram that fails to decode is dropped; the loop keeps serving.

use tokio::net::UdpSocket;
use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::message::Message;
use crate::server::ServerHandle;

/// Largest datagram accepted
pub const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Serve datagrams on `socket` until the SessionServer goes away
pub async fn serve(socket: UdpSocket, server: ServerHandle) -> Result<(), AppError> {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (len, addr) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!("Failed to receive datagram: {}", e);
                continue;
            }
        };

        debug!("Received {} bytes from {}", len, addr);

        let message = match Message::decode(&buf[..len]) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping datagram from {}: {}", addr, e);
                continue;
            }
        };

        debug!(
            "{} {} from '{}' ({} bytes of payload)",
            message.message_type(),
            message.operation(),
            message.user(),
            message.data().len()
        );

        let response = server.handle(addr, message).await?;

        if let Err(e) = socket.send_to(response.as_bytes(), addr).await {
            error!("Failed to send reply to {}: {}", addr, e);
        }
    }
}
