//! UseCase 層（Presence & Message Broker）
//!
//! 受信イベントごとに1つのユースケースを定義します。各ユースケースは
//! Connection Registry と MessagePusher の trait にのみ依存します。
//!
//! - `connect`: トランスポート接続の受付（送信チャンネルの登録）
//! - `join_room`: join イベント（roster 更新とルーム参加、参加通知）
//! - `send_message`: message イベント（ルーム全員への転送、送信者を含む）
//! - `typing`: typing / stopTyping イベント（送信者以外への転送）
//! - `disconnect`: 切断処理（roster からの削除、退出通知）
//! - `status`: 死活監視用の読み取り専用サーフェス

mod connect;
mod disconnect;
mod error;
mod join_room;
mod send_message;
mod status;
mod typing;

pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::EventError;
pub use join_room::JoinRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use status::StatusUseCase;
pub use typing::TypingUseCase;
