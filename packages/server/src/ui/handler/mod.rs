//! Request handlers for the WebSocket and HTTP endpoints.

pub mod http;
pub mod websocket;
