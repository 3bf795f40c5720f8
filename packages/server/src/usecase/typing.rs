//! UseCase: typing / stopTyping イベント処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TypingUseCase::forward() メソッド
//! - 転送対象の選定（送信者を除くルームメンバー）
//!
//! ### なぜこのテストが必要か
//! - 「typing 通知は送信者自身には決して届かない」ことが仕様の性質
//! - サーバー側に typing 状態を一切保持しないことを保証
//!   （クライアントが start/stop のストリームから各自再構築する）
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数参加者への転送
//! - エッジケース：送信者のみが参加している場合（転送対象なし）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher, RoomName};

/// typing / stopTyping イベントのユースケース
///
/// start / stop は同じ転送規則なので1つのユースケースで扱います。
/// registry は読み取りのみで、typing 状態は保持しません。
pub struct TypingUseCase {
    /// Connection Registry（転送対象の取得に使用、変更はしない）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 配送先のルーム
    room: RoomName,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
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

    /// typing / stopTyping をルームの送信者以外のメンバーに転送する
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信元の接続 ID（転送対象から除外される）
    /// * `json_message` - 転送する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// 転送対象となった接続 ID のリスト
    pub async fn forward(
        &self,
        sender: &ConnectionId,
        json_message: &str,
    ) -> Result<Vec<ConnectionId>, MessagePushError> {
        let targets: Vec<ConnectionId> = self
            .registry
            .room_members(&self.room)
            .await
            .into_iter()
            .filter(|member| member != sender)
            .collect();

        self.message_pusher
            .broadcast(targets.clone(), json_message)
            .await?;

        Ok(targets)
    }
}
