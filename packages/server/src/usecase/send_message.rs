//! UseCase: message イベント処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ブロードキャスト対象の選定（送信者を含むルーム全員）
//!
//! ### なぜこのテストが必要か
//! - 「送信者自身もブロードキャストからエコーを受け取る」ことが仕様の
//!   中心的な性質（クライアントは自分のメッセージをこのエコーで描画する）
//! - registry を一切変更しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数参加者がいるルームへの送信
//! - エッジケース：送信者のみが参加している場合
//! - エッジケース：join していない接続からの送信

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePushError, MessagePusher, RoomName};

/// message イベントのユースケース
///
/// メッセージ内の送信者 attributes（userId / displayName / avatarUrl）は
/// クライアント申告のまま転送され、registry とは照合されません。この
/// 信頼境界の扱いは DESIGN.md に記録しています。
pub struct SendMessageUseCase {
    /// Connection Registry（ブロードキャスト対象の取得に使用、変更はしない）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 配送先のルーム
    room: RoomName,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージをルームの全メンバー（送信者を含む）に転送する
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信元の接続 ID（ログ用。配送対象の選定には使わない）
    /// * `json_message` - 転送する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// 配送対象となった接続 ID のリスト
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        json_message: &str,
    ) -> Result<Vec<ConnectionId>, MessagePushError> {
        // ルーム membership の呼び出し時点の snapshot に対して fan-out する
        let targets = self.registry.room_members(&self.room).await;

        tracing::debug!(
            "Broadcasting message from connection '{}' to {} room members",
            sender,
            targets.len()
        );

        self.message_pusher
            .broadcast(targets.clone(), json_message)
            .await?;

        Ok(targets)
    }
}
