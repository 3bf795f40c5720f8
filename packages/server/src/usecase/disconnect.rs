//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - roster からの削除（connection_id で照合）と通知要否の判定
//!
//! ### なぜこのテストが必要か
//! - 再接続で置き換え済みの古いセッションの切断（stale disconnect）が
//!   新しいセッションを追い出さないことはこのリレーの中心的な不変条件
//! - 削除が実際に起きた場合にのみ退出通知が出ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：現在のセッションの切断
//! - stale disconnect：再接続で置き換え済みのセッションの切断
//! - エッジケース：一度も join しなかった接続の切断

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher, RoomName, RosterEntry,
    RosterSnapshot,
};

/// 切断処理のユースケース
pub struct DisconnectUseCase {
    /// Connection Registry（オンラインユーザーの唯一の情報源）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 退出元のルーム
    room: RoomName,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        room: RoomName,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            room,
        }
    }

    /// 切断を実行する
    ///
    /// 送信チャンネルの登録解除とルームからの退出を行い、roster からは
    /// 「現在この接続が所有しているエントリ」だけを削除します。再接続で
    /// 置き換え済みの接続からの切断では roster は変化せず `None` が
    /// 返ります。その場合、呼び出し側は通知を一切出してはいけません。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断した接続の ID
    ///
    /// # Returns
    ///
    /// 削除されたエントリ（あれば）と、呼び出し後の roster
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> (Option<RosterEntry>, RosterSnapshot) {
        // まず配送対象から外す。以降の broadcast は「残っている接続」に届く
        self.message_pusher
            .unregister_connection(connection_id)
            .await;
        self.registry.leave_room(&self.room, connection_id).await;

        let (removed, snapshot) = self.registry.remove_by_connection(connection_id).await;

        match &removed {
            Some(entry) => {
                tracing::info!(
                    "Connection '{}' disconnected, '{}' left the chat",
                    connection_id,
                    entry.display_name
                );
            }
            None => {
                tracing::debug!(
                    "Connection '{}' disconnected without owning a roster entry",
                    connection_id
                );
            }
        }

        (removed, snapshot)
    }

    /// 退出通知を残っているすべてのクライアントにブロードキャストする
    pub async fn broadcast_user_left(&self, message: &str) -> Result<(), MessagePushError> {
        self.message_pusher.broadcast_all(message).await
    }

    /// 更新後の roster を残っているすべてのクライアントにブロードキャストする
    pub async fn broadcast_roster(&self, message: &str) -> Result<(), MessagePushError> {
        self.message_pusher.broadcast_all(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
    };
    use tokio::sync::mpsc;

    fn chat_room() -> RoomName {
        RoomName::new("chat-room".to_string()).unwrap()
    }

    fn create_test_registry() -> Arc<InMemoryConnectionRegistry> {
        Arc::new(InMemoryConnectionRegistry::new(chat_room()))
    }

    async fn join(registry: &InMemoryConnectionRegistry, conn: &str, user: &str, name: &str) {
        let connection_id = ConnectionId::new(conn.to_string());
        registry
            .upsert(RosterEntry {
                connection_id: connection_id.clone(),
                user_id: UserId::new(user.to_string()).unwrap(),
                display_name: name.to_string(),
                avatar_url: String::new(),
                connected_at: 1000,
            })
            .await;
        registry.join_room(&chat_room(), connection_id).await;
    }

    #[tokio::test]
    async fn test_disconnect_removes_owned_entry() {
        // テスト項目: 現在のセッションの切断で roster から削除される
        // given (前提条件):
        let registry = create_test_registry();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher, chat_room());
        join(&registry, "conn1", "u1", "Alice").await;
        join(&registry, "conn2", "u2", "Bob").await;

        // when (操作):
        let (removed, snapshot) = usecase
            .execute(&ConnectionId::new("conn1".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().display_name, "Alice");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].display_name, "Bob");
        assert_eq!(registry.room_members(&chat_room()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_disconnect_is_noop_on_roster() {
        // テスト項目: 再接続で置き換え済みのセッションの切断では roster が変化しない
        // given (前提条件):
        let registry = create_test_registry();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher, chat_room());
        join(&registry, "conn1", "u1", "Alice").await;
        join(&registry, "conn2", "u1", "Alice2").await;

        // when (操作): 古いセッション conn1 が切断される
        let (removed, snapshot) = usecase
            .execute(&ConnectionId::new("conn1".to_string()))
            .await;

        // then (期待する結果): 新しいセッションが roster に残る
        assert!(removed.is_none());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].connection_id.as_str(), "conn2");
        assert_eq!(snapshot[0].display_name, "Alice2");
    }

    #[tokio::test]
    async fn test_live_disconnect_after_reconnect_removes_entry() {
        // テスト項目: 再接続後、新しいセッションの切断でエントリが削除される
        // given (前提条件):
        let registry = create_test_registry();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher, chat_room());
        join(&registry, "conn1", "u1", "Alice").await;
        join(&registry, "conn2", "u1", "Alice2").await;

        // when (操作):
        let (removed, snapshot) = usecase
            .execute(&ConnectionId::new("conn2".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().display_name, "Alice2");
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_of_never_joined_connection() {
        // テスト項目: 一度も join しなかった接続の切断では何も削除されない
        // given (前提条件):
        let registry = create_test_registry();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher, chat_room());
        join(&registry, "conn1", "u1", "Alice").await;

        // when (操作):
        let (removed, snapshot) = usecase
            .execute(&ConnectionId::new("lurker".to_string()))
            .await;

        // then (期待する結果):
        assert!(removed.is_none());
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_disconnected_connection_no_longer_receives_broadcasts() {
        // テスト項目: 切断処理後の broadcast が切断済み接続に届かない
        // given (前提条件):
        let registry = create_test_registry();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher.clone(), chat_room());
        let conn1 = ConnectionId::new("conn1".to_string());
        let conn2 = ConnectionId::new("conn2".to_string());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(conn1.clone(), tx1).await;
        pusher.register_connection(conn2.clone(), tx2).await;
        join(&registry, "conn1", "u1", "Alice").await;
        join(&registry, "conn2", "u2", "Bob").await;

        // when (操作): conn1 を切断してから退出通知を送る
        usecase.execute(&conn1).await;
        usecase.broadcast_user_left("user-left").await.unwrap();

        // then (期待する結果): 残っている conn2 にのみ届く
        assert_eq!(rx2.recv().await, Some("user-left".to_string()));
        assert!(rx1.try_recv().is_err());
    }
}
