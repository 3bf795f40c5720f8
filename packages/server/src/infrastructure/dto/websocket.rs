//! WebSocket event DTOs.
//!
//! Every event on the wire is a JSON object with a `type` tag. Inbound
//! events (client to relay) and outbound events (relay to client) are
//! modeled as two internally-tagged enums; the `message`, `typing` and
//! `stopTyping` payloads are shared between the two directions because the
//! relay forwards them verbatim.
//!
//! Required fields are enforced at decode time: an inbound event missing
//! `userId` (or `content` / `displayName` where listed) fails to parse and
//! is dropped by the broker with a diagnostic. Optional display attributes
//! default to the empty string.

use serde::{Deserialize, Serialize};

/// Inbound events, client to relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    Join(JoinPayload),
    Message(MessagePayload),
    Typing(TypingPayload),
    StopTyping(TypingPayload),
}

/// Outbound events, relay to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    OnlineUsers(RosterPayload),
    UserJoined(PresencePayload),
    UserLeft(PresencePayload),
    Message(MessagePayload),
    Typing(TypingPayload),
    StopTyping(TypingPayload),
}

/// `join` payload: the identity a client claims when entering the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// `message` payload. Sent by a client and echoed verbatim to the room,
/// sender included. The timestamp is a client-supplied ISO-8601 string and
/// is not validated or regenerated by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub timestamp: String,
}

/// `typing` / `stopTyping` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
}

/// One roster entry as carried by `onlineUsers` / `userJoined` / `userLeft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUserDto {
    pub connection_id: String,
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// `onlineUsers` payload: the full roster in first-join order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub online_users: Vec<OnlineUserDto>,
}

/// `userJoined` / `userLeft` payload: who changed, plus the updated roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub display_name: String,
    pub online_users: Vec<OnlineUserDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_join_event() {
        // テスト項目: join イベントの JSON が正しくパースされる
        // given (前提条件):
        let json = r#"{"type":"join","userId":"u1","displayName":"Alice","avatarUrl":"https://a.example.com/1.png"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::Join(payload) => {
                assert_eq!(payload.user_id, "u1");
                assert_eq!(payload.display_name, "Alice");
                assert_eq!(payload.avatar_url, "https://a.example.com/1.png");
            }
            other => panic!("expected join, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_join_without_avatar_defaults_to_empty() {
        // テスト項目: avatarUrl が無い join イベントは空文字で補完される
        // given (前提条件):
        let json = r#"{"type":"join","userId":"u1","displayName":"Alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        match event {
            ClientEvent::Join(payload) => assert_eq!(payload.avatar_url, ""),
            other => panic!("expected join, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_join_without_display_name_fails() {
        // テスト項目: displayName が無い join イベントはパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"join","userId":"u1"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_message_without_content_fails() {
        // テスト項目: content が無い message イベントはパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"message","userId":"u1","displayName":"Alice"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_stop_typing_event() {
        // テスト項目: stopTyping イベントがタグで判別される
        // given (前提条件):
        let json = r#"{"type":"stopTyping","userId":"u1","displayName":"Alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(matches!(event, ClientEvent::StopTyping(_)));
    }

    #[test]
    fn test_deserialize_unknown_event_type_fails() {
        // テスト項目: 未知のイベント種別はパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"leaveRoom","userId":"u1"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_online_users_event() {
        // テスト項目: onlineUsers イベントが期待する JSON 形式で出力される
        // given (前提条件):
        let event = ServerEvent::OnlineUsers(RosterPayload {
            online_users: vec![OnlineUserDto {
                connection_id: "conn1".to_string(),
                user_id: "u1".to_string(),
                display_name: "Alice".to_string(),
                avatar_url: "".to_string(),
            }],
        });

        // when (操作):
        let json = serde_json::to_string(&event).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"onlineUsers""#));
        assert!(json.contains(r#""connectionId":"conn1""#));
        assert!(json.contains(r#""userId":"u1""#));
        assert!(json.contains(r#""displayName":"Alice""#));
    }

    #[test]
    fn test_serialize_user_joined_and_user_left_tags_differ() {
        // テスト項目: userJoined と userLeft が type タグで区別される
        // given (前提条件):
        let payload = PresencePayload {
            display_name: "Bob".to_string(),
            online_users: vec![],
        };

        // when (操作):
        let joined = serde_json::to_string(&ServerEvent::UserJoined(payload.clone())).unwrap();
        let left = serde_json::to_string(&ServerEvent::UserLeft(payload)).unwrap();

        // then (期待する結果):
        assert!(joined.contains(r#""type":"userJoined""#));
        assert!(left.contains(r#""type":"userLeft""#));
    }

    #[test]
    fn test_message_event_round_trip_is_verbatim() {
        // テスト項目: message イベントが全フィールドを保ったまま往復できる
        // given (前提条件):
        let json = r#"{"type":"message","userId":"u1","content":"hi","displayName":"Alice","avatarUrl":"a.png","timestamp":"2026-08-07T12:00:00.000Z"}"#;

        // when (操作):
        let inbound: ClientEvent = serde_json::from_str(json).unwrap();
        let payload = match inbound {
            ClientEvent::Message(payload) => payload,
            other => panic!("expected message, got {:?}", other),
        };
        let outbound = serde_json::to_string(&ServerEvent::Message(payload)).unwrap();

        // then (期待する結果):
        assert!(outbound.contains(r#""type":"message""#));
        assert!(outbound.contains(r#""content":"hi""#));
        assert!(outbound.contains(r#""timestamp":"2026-08-07T12:00:00.000Z""#));
    }
}
