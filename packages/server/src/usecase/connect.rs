//! UseCase: トランスポート接続の受付
//!
//! 接続確立の時点では identity はまだありません（join イベントで
//! 初めて登録されます）。ここでは fan-out 用の送信チャンネルを
//! MessagePusher に登録するだけです。roster の broadcast は
//! 「接続済みのすべてのクライアント」に届く仕様のため、join 前の
//! 接続もこの時点から配送対象になります。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続受付のユースケース
pub struct ConnectUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUseCase {
    /// 新しい ConnectUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を受け付け、送信チャンネルを登録する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - トランスポート層が割り当てた接続 ID
    /// * `sender` - この接続へのメッセージ送信用チャンネル
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_connection(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' established", connection_id);
    }
}
