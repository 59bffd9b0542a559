//! Connection Manager Integration Tests
//!
//! Drives the manager through a recording transport, frame by frame.

use std::time::Duration;

use taskhub_realtime::{
    ConnectionManager, ConnectionState, RealtimeError, RealtimeResult, ReconnectPolicy,
    ReconnectStep, SendPlan, ServerEvent, SocketEvent, Transport, CHAT_NAMESPACE,
};

#[derive(Default)]
struct RecordingTransport {
    opened: Vec<String>,
    sent: Vec<String>,
    closed: u32,
    fail_send: bool,
}

impl Transport for RecordingTransport {
    fn open(&mut self, url: &str) -> RealtimeResult<()> {
        self.opened.push(url.to_string());
        Ok(())
    }

    fn send(&mut self, frame: &str) -> RealtimeResult<()> {
        if self.fail_send {
            return Err(RealtimeError::Transport("socket closed".to_string()));
        }
        self.sent.push(frame.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}

fn chat_manager() -> ConnectionManager<RecordingTransport> {
    ConnectionManager::new(
        RecordingTransport::default(),
        "http://localhost:3000",
        CHAT_NAMESPACE,
        ReconnectPolicy::default(),
    )
}

fn connected_manager() -> ConnectionManager<RecordingTransport> {
    let mut m = chat_manager();
    m.connect("secret").unwrap();
    m.handle_frame(r#"0{"sid":"e1","pingInterval":25000,"pingTimeout":20000}"#).unwrap();
    m.handle_frame(r#"40/chat,{"sid":"n1"}"#).unwrap();
    m.transport_mut().sent.clear();
    m
}

#[test]
fn test_handshake_sends_namespace_connect_with_token() {
    let mut m = chat_manager();
    m.connect("secret").unwrap();
    assert_eq!(m.transport().opened, vec!["ws://localhost:3000/socket.io/?EIO=4&transport=websocket"]);

    let events = m.handle_frame(r#"0{"sid":"e1","pingInterval":25000,"pingTimeout":20000}"#).unwrap();
    assert!(events.is_empty());
    assert_eq!(m.transport().sent, vec![r#"40/chat,{"token":"secret"}"#]);
    assert_eq!(m.state(), ConnectionState::Connecting);

    let events = m.handle_frame(r#"40/chat,{"sid":"n1"}"#).unwrap();
    assert_eq!(events, vec![SocketEvent::Connected]);
    assert!(m.is_connected());
}

#[test]
fn test_ping_is_answered_with_pong() {
    let mut m = connected_manager();
    m.handle_frame("2").unwrap();
    assert_eq!(m.transport().sent, vec!["3"]);
}

#[test]
fn test_duplicate_join_keeps_single_membership() {
    let mut m = connected_manager();
    assert!(m.join_room(5).unwrap());
    assert!(!m.join_room(5).unwrap());

    assert_eq!(m.joined_rooms().collect::<Vec<_>>(), vec![5]);
    assert_eq!(m.transport().sent, vec![r#"42/chat,["room:join",{"roomId":5}]"#]);
}

#[test]
fn test_rooms_joined_before_connect_are_sent_on_ack() {
    let mut m = chat_manager();
    m.join_room(2).unwrap();
    m.join_room(1).unwrap();
    m.connect("secret").unwrap();
    assert!(m.transport().sent.is_empty());

    m.handle_frame(r#"40/chat,{"sid":"n1"}"#).unwrap();
    assert_eq!(
        m.transport().sent,
        vec![
            r#"42/chat,["room:join",{"roomId":1}]"#.to_string(),
            r#"42/chat,["room:join",{"roomId":2}]"#.to_string(),
        ]
    );
}

#[test]
fn test_reconnect_rejoins_previous_rooms() {
    let mut m = connected_manager();
    m.join_room(3).unwrap();
    m.transport_mut().sent.clear();

    assert_eq!(m.transport_closed(), ReconnectStep::RetryAfter(Duration::from_secs(1)));
    assert_eq!(m.state(), ConnectionState::Reconnecting { attempt: 1 });
    m.retry().unwrap();
    assert_eq!(m.transport().opened.len(), 2);

    m.handle_frame(r#"0{"sid":"e2"}"#).unwrap();
    m.handle_frame(r#"40/chat,{"sid":"n2"}"#).unwrap();
    assert!(m.is_connected());
    assert_eq!(
        m.transport().sent,
        vec![
            r#"40/chat,{"token":"secret"}"#.to_string(),
            r#"42/chat,["room:join",{"roomId":3}]"#.to_string(),
        ]
    );
}

#[test]
fn test_reconnect_budget_is_five_attempts() {
    let mut m = connected_manager();
    for attempt in 1..=5 {
        assert_eq!(m.transport_closed(), ReconnectStep::RetryAfter(Duration::from_secs(1)));
        assert_eq!(m.state(), ConnectionState::Reconnecting { attempt });
        m.retry().unwrap();
    }
    assert_eq!(m.transport_closed(), ReconnectStep::GiveUp);
    assert_eq!(m.state(), ConnectionState::Failed);
    // Further drops stay quiet
    assert_eq!(m.transport_closed(), ReconnectStep::Idle);
}

#[test]
fn test_successful_reconnect_resets_budget() {
    let mut m = connected_manager();
    for _ in 0..4 {
        m.transport_closed();
    }
    m.retry().unwrap();
    m.handle_frame(r#"40/chat,{"sid":"n2"}"#).unwrap();
    assert_eq!(m.transport_closed(), ReconnectStep::RetryAfter(Duration::from_secs(1)));
    assert_eq!(m.state(), ConnectionState::Reconnecting { attempt: 1 });
}

#[test]
fn test_connect_error_fails_without_retry() {
    let mut m = chat_manager();
    m.connect("expired").unwrap();
    let events = m.handle_frame(r#"44/chat,{"message":"unauthorized"}"#).unwrap();
    assert_eq!(events, vec![SocketEvent::Failed]);
    assert_eq!(m.state(), ConnectionState::Failed);
    assert_eq!(m.transport_closed(), ReconnectStep::Idle);
}

#[test]
fn test_emit_requires_connection() {
    let mut m = chat_manager();
    m.connect("secret").unwrap();
    let err = m
        .emit(&taskhub_realtime::ClientEvent::SendMessage { room_id: 1, content: "x".to_string() })
        .unwrap_err();
    assert!(matches!(err, RealtimeError::NotConnected));
}

#[test]
fn test_send_plan_after_failure_forces_single_reconnect() {
    let mut m = connected_manager();
    for _ in 0..6 {
        m.transport_closed();
    }
    assert_eq!(m.state(), ConnectionState::Failed);
    assert_eq!(m.plan_send(), SendPlan::ReconnectThenEmit(Duration::from_secs(1)));

    let opened_before = m.transport().opened.len();
    m.force_reconnect().unwrap();
    assert_eq!(m.transport().opened.len(), opened_before + 1);
    assert_eq!(m.state(), ConnectionState::Connecting);
}

#[test]
fn test_server_events_are_decoded() {
    let mut m = connected_manager();
    let events = m
        .handle_frame(r#"42/chat,["user:offline",{"userId":4}]"#)
        .unwrap();
    assert_eq!(events, vec![SocketEvent::Server(ServerEvent::UserOffline { user_id: 4 })]);

    // Other namespaces and undecodable payloads are dropped
    assert!(m.handle_frame(r#"42/notifications,["user:offline",{"userId":4}]"#).unwrap().is_empty());
    assert!(m.handle_frame(r#"42/chat,["message:new",{"id":"nope"}]"#).unwrap().is_empty());
}

#[test]
fn test_logout_disconnect_clears_rooms() {
    let mut m = connected_manager();
    m.join_room(8).unwrap();
    m.disconnect();

    assert_eq!(m.state(), ConnectionState::Disconnected);
    assert_eq!(m.joined_rooms().count(), 0);
    assert!(m.transport().sent.contains(&"41/chat,".to_string()));
    assert_eq!(m.plan_send(), SendPlan::Rollback);
    assert!(matches!(m.force_reconnect(), Err(RealtimeError::NotConnected)));
}

#[test]
fn test_transport_send_failure_propagates() {
    let mut m = connected_manager();
    m.transport_mut().fail_send = true;
    assert!(matches!(m.join_room(1), Err(RealtimeError::Transport(_))));
    // Membership is recorded so the next connect rejoins it
    assert!(m.is_joined(1));
}
