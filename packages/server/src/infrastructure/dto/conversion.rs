//! Conversion logic between DTOs and domain entities.
//!
//! Inbound conversions are fallible: they apply the value-object validation
//! (non-empty `userId`, non-empty `content`) on top of the structural checks
//! serde already performed. Outbound conversions are infallible.

use crate::domain::{
    ChatMessage, JoinRequest, MessageContent, RosterEntry, TypingNotice, UserId, ValueError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::JoinPayload> for JoinRequest {
    type Error = ValueError;

    fn try_from(payload: dto::JoinPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(payload.user_id)?,
            display_name: payload.display_name,
            avatar_url: payload.avatar_url,
        })
    }
}

impl TryFrom<dto::MessagePayload> for ChatMessage {
    type Error = ValueError;

    fn try_from(payload: dto::MessagePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(payload.user_id)?,
            display_name: payload.display_name,
            avatar_url: payload.avatar_url,
            content: MessageContent::new(payload.content)?,
            timestamp: payload.timestamp,
        })
    }
}

impl TryFrom<dto::TypingPayload> for TypingNotice {
    type Error = ValueError;

    fn try_from(payload: dto::TypingPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(payload.user_id)?,
            display_name: payload.display_name,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for dto::MessagePayload {
    fn from(model: ChatMessage) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            content: model.content.into_string(),
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            timestamp: model.timestamp,
        }
    }
}

impl From<TypingNotice> for dto::TypingPayload {
    fn from(model: TypingNotice) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            display_name: model.display_name,
        }
    }
}

impl From<RosterEntry> for dto::OnlineUserDto {
    fn from(entry: RosterEntry) -> Self {
        Self {
            connection_id: entry.connection_id.into_string(),
            user_id: entry.user_id.into_string(),
            display_name: entry.display_name,
            avatar_url: entry.avatar_url,
        }
    }
}

/// Convert a roster snapshot into its wire form, preserving order.
pub fn roster_to_dto(snapshot: Vec<RosterEntry>) -> Vec<dto::OnlineUserDto> {
    snapshot.into_iter().map(Into::into).collect()
}
