//! ドメイン層
//!
//! チャットリレーの中核となるモデルと抽象を定義します。
//!
//! - `value_object`: 値オブジェクト（ConnectionId, UserId など）
//! - `entity`: エンティティ（Roster, Room, ChatMessage など）
//! - `registry`: Connection Registry trait（オンラインユーザーの管理）
//! - `pusher`: MessagePusher trait（メッセージ送信の抽象化）
//! - `error`: ドメイン層のエラー型

mod entity;
mod error;
mod pusher;
mod registry;
mod value_object;

pub use entity::{ChatMessage, JoinRequest, Room, Roster, RosterEntry, TypingNotice};
pub use error::ValueError;
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::{ConnectionRegistry, RosterSnapshot};
pub use value_object::{ConnectionId, ConnectionIdFactory, MessageContent, RoomName, UserId};
