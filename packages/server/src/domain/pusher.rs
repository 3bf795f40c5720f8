//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（fan-out）の抽象化です。
//! Broker（UseCase 層）はこの trait を通じてのみトランスポートに触れます。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// 接続ごとの送信チャンネル
///
/// 送信は fire-and-forget です。unbounded チャンネルなので送信側は
/// ブロックせず、遅いクライアントへの背圧はトランスポート層の責務です。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信エラー
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// 接続が登録されていない
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    /// 送信に失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// メッセージ送信（通知）の抽象化
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続とその送信チャンネルを登録する
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にメッセージを送信する
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 指定した接続群にメッセージを送信する（部分失敗を許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 登録中のすべての接続にメッセージを送信する
    async fn broadcast_all(&self, content: &str) -> Result<(), MessagePushError>;

    /// 指定した接続を除くすべての接続にメッセージを送信する
    async fn broadcast_all_except(
        &self,
        exclude: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
