//! Integration tests for the chat relay, driven over real WebSockets.
//!
//! Each test boots the full stack (registry, pusher, usecases, router) on an
//! ephemeral port and talks to it with tokio-tungstenite, the same way the
//! CLI client does.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use idobata_server::{
    domain::RoomName,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
    },
    ui::Server,
    usecase::{
        ConnectUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase, StatusUseCase,
        TypingUseCase,
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Boot a relay on an ephemeral port and return its address.
async fn spawn_relay() -> SocketAddr {
    let room = RoomName::new("chat-room".to_string()).unwrap();
    let registry = Arc::new(InMemoryConnectionRegistry::new(room.clone()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let server = Server::new(
        Arc::new(ConnectUseCase::new(message_pusher.clone())),
        Arc::new(JoinRoomUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            room.clone(),
        )),
        Arc::new(SendMessageUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            room.clone(),
        )),
        Arc::new(TypingUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            room.clone(),
        )),
        Arc::new(DisconnectUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            room.clone(),
        )),
        Arc::new(StatusUseCase::new(registry, room)),
        "http://localhost:3000".to_string(),
    );

    let app = server.router().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn connect(addr: SocketAddr) -> WsStream {
    let url = format!("ws://{}/ws", addr);
    let (stream, _response) = connect_async(&url).await.expect("WebSocket connect failed");
    stream
}

async fn send_event(ws: &mut WsStream, event: Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("send failed");
}

/// Receive the next text event, with a bounded wait.
async fn recv_event(ws: &mut WsStream) -> Value {
    loop {
        match timeout(Duration::from_secs(2), ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                return serde_json::from_str(&text).expect("event is valid JSON");
            }
            Ok(Some(Ok(_))) => continue,
            Ok(Some(Err(e))) => panic!("WebSocket error while waiting for event: {e}"),
            Ok(None) => panic!("connection closed while waiting for event"),
            Err(_) => panic!("timed out waiting for event"),
        }
    }
}

async fn fetch_online_count(addr: SocketAddr) -> i64 {
    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["onlineUsers"].as_i64().unwrap()
}

fn join_event(user_id: &str, display_name: &str) -> Value {
    json!({
        "type": "join",
        "userId": user_id,
        "displayName": display_name,
        "avatarUrl": format!("https://avatars.example.com/{user_id}.png"),
    })
}

fn message_event(user_id: &str, display_name: &str, content: &str) -> Value {
    json!({
        "type": "message",
        "userId": user_id,
        "displayName": display_name,
        "avatarUrl": "",
        "content": content,
        "timestamp": "2026-08-07T12:00:00.000Z",
    })
}

#[tokio::test]
async fn test_health_endpoint_reflects_roster_size() {
    // テスト項目: /health が現在のオンラインユーザー数を副作用なしで返す
    // given (前提条件):
    let addr = spawn_relay().await;

    // when (操作):
    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body["status"], "OK");
    assert_eq!(body["onlineUsers"], 0);
    assert!(body["message"].as_str().unwrap().contains("running"));

    // join 後はその人数が反映される
    let mut alice = connect(addr).await;
    send_event(&mut alice, join_event("u1", "Alice")).await;
    let roster = recv_event(&mut alice).await;
    assert_eq!(roster["type"], "onlineUsers");
    assert_eq!(fetch_online_count(addr).await, 1);
}

#[tokio::test]
async fn test_end_to_end_chat_scenario() {
    // テスト項目: join → 参加通知 → メッセージ → typing → 切断の一連のシナリオ
    // given (前提条件):
    let addr = spawn_relay().await;

    // when/then: alice が join すると自身にも roster が届く
    let mut alice = connect(addr).await;
    send_event(&mut alice, join_event("u1", "Alice")).await;
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);
    assert_eq!(event["onlineUsers"][0]["displayName"], "Alice");

    // bob が join する
    let mut bob = connect(addr).await;
    send_event(&mut bob, join_event("u2", "Bob")).await;

    // bob は roster を受け取る（first-join 順）
    let event = recv_event(&mut bob).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 2);
    assert_eq!(event["onlineUsers"][0]["displayName"], "Alice");
    assert_eq!(event["onlineUsers"][1]["displayName"], "Bob");

    // alice は roster 更新と userJoined 通知の両方を受け取る
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 2);
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "userJoined");
    assert_eq!(event["displayName"], "Bob");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 2);

    // alice のメッセージは本人を含む全員に届く
    send_event(&mut alice, message_event("u1", "Alice", "hi")).await;
    let echo = recv_event(&mut alice).await;
    assert_eq!(echo["type"], "message");
    assert_eq!(echo["content"], "hi");
    assert_eq!(echo["userId"], "u1");
    let received = recv_event(&mut bob).await;
    assert_eq!(received["type"], "message");
    assert_eq!(received["content"], "hi");
    assert_eq!(received["timestamp"], "2026-08-07T12:00:00.000Z");

    // typing は送信者以外にのみ届く
    send_event(
        &mut alice,
        json!({"type": "typing", "userId": "u1", "displayName": "Alice"}),
    )
    .await;
    let event = recv_event(&mut bob).await;
    assert_eq!(event["type"], "typing");
    assert_eq!(event["displayName"], "Alice");
    send_event(
        &mut alice,
        json!({"type": "stopTyping", "userId": "u1", "displayName": "Alice"}),
    )
    .await;
    let event = recv_event(&mut bob).await;
    assert_eq!(event["type"], "stopTyping");

    // alice 自身には typing が届いていない: 次のメッセージのエコーが
    // alice の次のイベントであることを確認する
    send_event(&mut alice, message_event("u1", "Alice", "after-typing")).await;
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "message");
    assert_eq!(event["content"], "after-typing");
    let event = recv_event(&mut bob).await;
    assert_eq!(event["content"], "after-typing");

    // bob の切断で alice に userLeft と roster 更新が届く
    bob.close(None).await.unwrap();
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "userLeft");
    assert_eq!(event["displayName"], "Bob");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);
    assert_eq!(event["onlineUsers"][0]["displayName"], "Alice");
}

#[tokio::test]
async fn test_reconnect_replaces_entry_and_stale_disconnect_is_noop() {
    // テスト項目: 同一 user の再接続で roster が1エントリのまま置き換わり、
    //             古いセッションの切断では通知も roster 変更も起きない
    // given (前提条件):
    let addr = spawn_relay().await;

    let mut conn1 = connect(addr).await;
    send_event(&mut conn1, join_event("u1", "Alice")).await;
    let event = recv_event(&mut conn1).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);

    // when (操作): 同じ user_id が新しい接続・新しい表示名で join
    let mut conn2 = connect(addr).await;
    send_event(&mut conn2, join_event("u1", "Alice2")).await;

    // then (期待する結果): roster はエントリ1つ、表示名は Alice2
    let event = recv_event(&mut conn2).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);
    assert_eq!(event["onlineUsers"][0]["displayName"], "Alice2");
    assert_eq!(fetch_online_count(addr).await, 1);

    // 古いセッションには roster 更新と userJoined が届く（置き換えの観測）
    let event = recv_event(&mut conn1).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(event["onlineUsers"].as_array().unwrap().len(), 1);
    let event = recv_event(&mut conn1).await;
    assert_eq!(event["type"], "userJoined");

    // when (操作): 古いセッション conn1 が切断される
    conn1.close(None).await.unwrap();
    drop(conn1);

    // then (期待する結果): conn2 には userLeft が届かない。次に観測される
    // イベントは自分のメッセージのエコーであること
    send_event(&mut conn2, message_event("u1", "Alice2", "still here")).await;
    let event = recv_event(&mut conn2).await;
    assert_eq!(event["type"], "message");
    assert_eq!(event["content"], "still here");
    assert_eq!(fetch_online_count(addr).await, 1);

    // when (操作): 現在のセッション conn2 が切断される
    conn2.close(None).await.unwrap();
    drop(conn2);

    // then (期待する結果): roster が空になる
    let mut remaining = -1;
    for _ in 0..40 {
        remaining = fetch_online_count(addr).await;
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_malformed_events_are_dropped_without_side_effects() {
    // テスト項目: 必須フィールドを欠くイベントが roster を汚さずに捨てられる
    // given (前提条件):
    let addr = spawn_relay().await;
    let mut alice = connect(addr).await;

    // when (操作): displayName を欠いた join、content を欠いた message を送る
    send_event(&mut alice, json!({"type": "join", "userId": "u1"})).await;
    send_event(&mut alice, json!({"type": "message", "userId": "u1"})).await;
    send_event(&mut alice, json!({"not even": "an event"})).await;

    // then (期待する結果): roster は空のまま
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fetch_online_count(addr).await, 0);

    // 正しい join はその後も通常どおり処理される
    send_event(&mut alice, join_event("u1", "Alice")).await;
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "onlineUsers");
    assert_eq!(fetch_online_count(addr).await, 1);
}
