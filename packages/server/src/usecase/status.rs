//! UseCase: 死活監視用の読み取り専用サーフェス
//!
//! 外部オペレーターの liveness チェックに使われます。roster の snapshot を
//! 参照するだけで、副作用はありません。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, RoomName, RosterSnapshot};

/// ステータス取得のユースケース
pub struct StatusUseCase {
    /// Connection Registry（読み取りのみ）
    registry: Arc<dyn ConnectionRegistry>,
    /// 監視対象のルーム
    room: RoomName,
}

impl StatusUseCase {
    /// 新しい StatusUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, room: RoomName) -> Self {
        Self { registry, room }
    }

    /// 現在のオンラインユーザー数を取得する
    pub async fn online_count(&self) -> usize {
        self.registry.snapshot().await.len()
    }

    /// デバッグ用のルーム状態（membership と roster）を取得する
    pub async fn room_state(&self) -> (RoomName, Vec<ConnectionId>, RosterSnapshot) {
        let members = self.registry.room_members(&self.room).await;
        let roster = self.registry.snapshot().await;
        (self.room.clone(), members, roster)
    }
}
