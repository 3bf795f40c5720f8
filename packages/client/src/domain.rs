//! Domain logic for client-side operations.
//!
//! This module contains pure functions and state that implement client
//! behavior without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A rejected handshake will not succeed on retry, so the client exits
/// instead of reconnecting.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::HandshakeRejected(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Per-peer typing state, reconstructed from the relay's `typing` /
/// `stopTyping` stream.
///
/// The relay keeps no typing state of its own; every client builds its own
/// view from the events it receives. Entries are keyed by `user_id` and
/// reconciled against roster updates so a peer that disconnects mid-typing
/// does not stay "typing" forever.
#[derive(Debug, Default)]
pub struct TypingTracker {
    // (user_id, display_name), in the order typing started
    typing: Vec<(String, String)>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a peer started typing. Returns `true` if the peer was not
    /// already tracked. A repeated start refreshes the display name.
    pub fn start(&mut self, user_id: &str, display_name: &str) -> bool {
        match self.typing.iter().position(|(id, _)| id == user_id) {
            Some(index) => {
                self.typing[index].1 = display_name.to_string();
                false
            }
            None => {
                self.typing
                    .push((user_id.to_string(), display_name.to_string()));
                true
            }
        }
    }

    /// Record that a peer stopped typing. Returns `true` if the peer was tracked.
    pub fn stop(&mut self, user_id: &str) -> bool {
        let before = self.typing.len();
        self.typing.retain(|(id, _)| id != user_id);
        self.typing.len() != before
    }

    /// Drop tracked peers that are no longer in the roster.
    pub fn retain_users(&mut self, online_user_ids: &[String]) {
        self.typing
            .retain(|(id, _)| online_user_ids.iter().any(|online| online == id));
    }

    pub fn is_typing(&self, user_id: &str) -> bool {
        self.typing.iter().any(|(id, _)| id == user_id)
    }

    /// Display names of currently-typing peers, in typing-start order.
    pub fn typing_names(&self) -> Vec<String> {
        self.typing.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.typing.is_empty()
    }
}
