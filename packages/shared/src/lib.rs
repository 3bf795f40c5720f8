//! Shared utilities for the idobata chat relay.
//!
//! This crate holds the pieces both binaries need: logging setup and
//! time helpers.

pub mod logger;
pub mod time;
