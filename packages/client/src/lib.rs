//! CLI chat client library.
//!
//! Connects to the idobata relay, joins the room with a claimed identity,
//! and renders chat messages, presence changes, and typing state.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
