//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// user id が空
    #[error("user id must not be empty")]
    EmptyUserId,

    /// メッセージ本文が空
    #[error("message content must not be empty")]
    EmptyMessageContent,

    /// ルーム名が空
    #[error("room name must not be empty")]
    EmptyRoomName,
}
