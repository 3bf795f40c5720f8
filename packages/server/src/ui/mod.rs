//! UI 層（axum による WebSocket / HTTP サーフェス）

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
