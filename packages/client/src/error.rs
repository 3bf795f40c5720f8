//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the WebSocket handshake (e.g. untrusted origin)
    #[error("Server rejected the handshake with HTTP {0}")]
    HandshakeRejected(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
