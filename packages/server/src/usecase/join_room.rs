//! UseCase: join イベント処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - roster の upsert（新規参加・再接続時の置き換え）とルーム参加
//! - 参加通知のブロードキャスト対象選定
//!
//! ### なぜこのテストが必要か
//! - roster が user_id で一意であることはこのリレーの中心的な不変条件
//! - 再接続（同じ user_id・新しい接続）でエントリが増殖しないことを保証
//! - userJoined 通知が参加者本人に届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの join
//! - 再接続：既存ユーザーが新しい接続・新しい表示名で join
//! - エッジケース：参加者が1人だけの場合の通知対象

use std::sync::Arc;

use idobata_shared::time::now_utc_millis;

use crate::domain::{
    ConnectionId, ConnectionRegistry, JoinRequest, MessagePushError, MessagePusher, RoomName,
    RosterEntry, RosterSnapshot,
};

/// join イベントのユースケース
pub struct JoinRoomUseCase {
    /// Connection Registry（オンラインユーザーの唯一の情報源）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 参加先のルーム
    room: RoomName,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// join を実行する
    ///
    /// roster を upsert し（同じ user_id のエントリはその場で置き換え）、
    /// 接続をルームに参加させます。置き換えは無条件の last-write-wins です。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - join した接続の ID
    /// * `request` - クライアントが申告した identity
    ///
    /// # Returns
    ///
    /// 更新後の roster
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        request: JoinRequest,
    ) -> RosterSnapshot {
        let entry = RosterEntry {
            connection_id: connection_id.clone(),
            user_id: request.user_id,
            display_name: request.display_name,
            avatar_url: request.avatar_url,
            connected_at: now_utc_millis(),
        };

        let snapshot = self.registry.upsert(entry).await;
        self.registry
            .join_room(&self.room, connection_id.clone())
            .await;

        snapshot
    }

    /// 更新後の roster を接続中のすべてのクライアントにブロードキャストする
    pub async fn broadcast_roster(&self, message: &str) -> Result<(), MessagePushError> {
        self.message_pusher.broadcast_all(message).await
    }

    /// 参加通知を参加者本人以外のすべてのクライアントにブロードキャストする
    pub async fn broadcast_user_joined(
        &self,
        joined: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher
            .broadcast_all_except(joined, message)
            .await
    }
}
