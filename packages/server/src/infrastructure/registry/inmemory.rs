//! InMemory Connection Registry 実装
//!
//! Roster と Room membership を単一の Mutex で保護します。trait の
//! 各メソッドはロックを1回だけ取得するため、`upsert` /
//! `remove_by_connection` は他の呼び出しに対してアトミックです。
//! ハンドラが複数タスクで動いていても、registry の更新が部分的に
//! 観測されることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRegistry, Room, RoomName, Roster, RosterEntry, RosterSnapshot,
};

struct RegistryState {
    roster: Roster,
    rooms: HashMap<RoomName, Room>,
}

/// インメモリ Connection Registry 実装
pub struct InMemoryConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryConnectionRegistry {
    /// Create a registry with the given room pre-created.
    ///
    /// Exactly one room exists for the lifetime of the process; it is seeded
    /// here so membership operations never have to create rooms lazily.
    pub fn new(default_room: RoomName) -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(default_room.clone(), Room::new(default_room));
        Self {
            state: Mutex::new(RegistryState {
                roster: Roster::new(),
                rooms,
            }),
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn upsert(&self, entry: RosterEntry) -> RosterSnapshot {
        let mut state = self.state.lock().await;
        state.roster.upsert(entry);
        state.roster.snapshot()
    }

    async fn remove_by_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> (Option<RosterEntry>, RosterSnapshot) {
        let mut state = self.state.lock().await;
        let removed = state.roster.remove_by_connection(connection_id);
        (removed, state.roster.snapshot())
    }

    async fn snapshot(&self) -> RosterSnapshot {
        let state = self.state.lock().await;
        state.roster.snapshot()
    }

    async fn join_room(&self, room: &RoomName, connection_id: ConnectionId) {
        let mut state = self.state.lock().await;
        state
            .rooms
            .entry(room.clone())
            .or_insert_with(|| Room::new(room.clone()))
            .join(connection_id);
    }

    async fn leave_room(&self, room: &RoomName, connection_id: &ConnectionId) {
        let mut state = self.state.lock().await;
        if let Some(room) = state.rooms.get_mut(room) {
            room.leave(connection_id);
        }
    }

    async fn room_members(&self, room: &RoomName) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(room)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    async fn count_online(&self) -> usize {
        let state = self.state.lock().await;
        state.roster.len()
    }
}
