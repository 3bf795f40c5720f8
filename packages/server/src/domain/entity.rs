//! エンティティ定義
//!
//! Roster（オンラインユーザー一覧）と Room（ブロードキャストグループ）が
//! リレーの状態のすべてです。どちらも純粋なデータ構造であり、
//! 排他制御は Infrastructure 層が担当します。

use std::collections::HashSet;

use super::value_object::{ConnectionId, MessageContent, RoomName, UserId};

/// One online user, as tracked by the Connection Registry.
///
/// The roster is keyed by `user_id`; `connection_id` identifies which
/// transport session currently owns the entry and rotates on reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_url: String,
    /// Unix timestamp (UTC, milliseconds) of the owning session's join.
    /// Internal bookkeeping; not part of the broadcast roster payload.
    pub connected_at: i64,
}

/// Ordered set of currently-present users, unique by `user_id`.
///
/// Iteration order is first-join order. A reconnect replaces the existing
/// entry in place, so the user keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `entry.user_id`.
    ///
    /// If an entry with the same `user_id` exists it is replaced in place
    /// (rejoin/reconnect, possibly with a changed display name). Otherwise
    /// the entry is appended. Always succeeds.
    pub fn upsert(&mut self, entry: RosterEntry) {
        match self
            .entries
            .iter()
            .position(|existing| existing.user_id == entry.user_id)
        {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove the entry whose CURRENT `connection_id` equals the argument.
    ///
    /// Returns `None` without mutation when no entry matches: either this
    /// connection never joined, or it was superseded by a reconnect. A stale
    /// disconnect must not evict the newer session, which is why matching is
    /// on `connection_id` rather than `user_id`.
    pub fn remove_by_connection(&mut self, connection_id: &ConnectionId) -> Option<RosterEntry> {
        let position = self
            .entries
            .iter()
            .position(|entry| &entry.connection_id == connection_id)?;
        Some(self.entries.remove(position))
    }

    /// Read-only copy of the current roster, in first-join order.
    pub fn snapshot(&self) -> Vec<RosterEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_user(&self, user_id: &UserId) -> bool {
        self.entries.iter().any(|entry| &entry.user_id == user_id)
    }
}

/// A named broadcast group. Membership is by connection, not by user:
/// fan-out targets are transport sessions.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    members: HashSet<ConnectionId>,
}

impl Room {
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: HashSet::new(),
        }
    }

    /// Add a connection to the room. Returns `false` if it was already a member.
    pub fn join(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Remove a connection from the room. Returns `false` if it was not a member.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    /// Membership snapshot at call time.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Validated form of an inbound `join` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

/// Validated form of an inbound `message` event.
///
/// Sender attributes are copied from the client-supplied payload and are NOT
/// cross-checked against the Connection Registry; any connected client can
/// emit under any identity. The timestamp is a client-supplied string and is
/// passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_url: String,
    pub content: MessageContent,
    pub timestamp: String,
}

/// Validated form of an inbound `typing` / `stopTyping` event.
///
/// Transient: the relay keeps no set of currently-typing users. Each client
/// reconstructs its own per-peer typing view from the start/stop stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingNotice {
    pub user_id: UserId,
    pub display_name: String,
}
