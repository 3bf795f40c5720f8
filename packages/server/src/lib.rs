//! Chat relay server library.
//!
//! A single-process relay that tracks which users are connected, brokers
//! chat messages and typing events among all connected clients, and keeps
//! a consistent online-user roster across joins and disconnects.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
