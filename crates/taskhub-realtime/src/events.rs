//! Socket Events
//!
//! Typed payloads for the `/chat` and `/notifications` namespaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RealtimeResult;

/// Minimal user info embedded in messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A server-confirmed chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u32,
    pub room_id: u32,
    pub sender_id: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub sender: Option<UserSummary>,
}

/// Read receipt broadcast after a member opens a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub room_id: u32,
    pub user_id: u32,
    #[serde(default)]
    pub message_ids: Vec<u32>,
}

/// Deadline reminder pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReminder {
    pub task_id: u32,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TaskAssigned,
    TaskUnassigned,
    TaskDeadline,
    TaskUpdated,
}

/// User-scoped notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub task_id: Option<u32>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Events the client emits
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinRoom { room_id: u32 },
    SendMessage { room_id: u32, content: String },
    MarkRead { room_id: u32 },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom { .. } => "room:join",
            ClientEvent::SendMessage { .. } => "message:send",
            ClientEvent::MarkRead { .. } => "message:read",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            ClientEvent::JoinRoom { room_id } => json!({ "roomId": room_id }),
            ClientEvent::SendMessage { room_id, content } => {
                json!({ "roomId": room_id, "content": content })
            }
            ClientEvent::MarkRead { room_id } => json!({ "roomId": room_id }),
        }
    }
}

/// Events the server emits
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    MessageNew(ChatMessage),
    MessageSent(ChatMessage),
    MessageRead(ReadReceipt),
    MessageError { message: String },
    UserOnline { user_id: u32 },
    UserOffline { user_id: u32 },
    TaskDueReminder(DueReminder),
    NotificationNew(Notification),
    Unknown { name: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserIdPayload {
    user_id: u32,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
}

impl ServerEvent {
    /// Decode an event by wire name
    pub fn from_wire(name: &str, data: Value) -> RealtimeResult<Self> {
        let event = match name {
            "message:new" => ServerEvent::MessageNew(serde_json::from_value(data)?),
            "message:sent" => ServerEvent::MessageSent(serde_json::from_value(data)?),
            "message:read" => ServerEvent::MessageRead(serde_json::from_value(data)?),
            "message:error" => {
                let payload: ErrorPayload = serde_json::from_value(data)?;
                ServerEvent::MessageError {
                    message: payload.message.unwrap_or_else(|| "Mesaj göndərilmədi".to_string()),
                }
            }
            "user:online" => {
                let payload: UserIdPayload = serde_json::from_value(data)?;
                ServerEvent::UserOnline { user_id: payload.user_id }
            }
            "user:offline" => {
                let payload: UserIdPayload = serde_json::from_value(data)?;
                ServerEvent::UserOffline { user_id: payload.user_id }
            }
            "task:due-reminder" => ServerEvent::TaskDueReminder(serde_json::from_value(data)?),
            "notification:new" => ServerEvent::NotificationNew(serde_json::from_value(data)?),
            other => ServerEvent::Unknown { name: other.to_string() },
        };
        Ok(event)
    }
}

/// What the connection manager reports back to its driver
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    /// Namespace connect acknowledged, rooms rejoined
    Connected,
    /// Server refused the namespace connect
    Failed,
    Server(ServerEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_payloads() {
        let send = ClientEvent::SendMessage { room_id: 3, content: "salam".to_string() };
        assert_eq!(send.name(), "message:send");
        assert_eq!(send.payload(), json!({"roomId": 3, "content": "salam"}));
        assert_eq!(ClientEvent::JoinRoom { room_id: 9 }.name(), "room:join");
    }

    #[test]
    fn test_decode_message_new() {
        let data = json!({
            "id": 11,
            "roomId": 2,
            "senderId": 5,
            "content": "hi",
            "createdAt": "2026-01-05T10:00:00Z",
            "sender": {"id": 5, "name": "Aysel"}
        });
        let event = ServerEvent::from_wire("message:new", data).unwrap();
        let ServerEvent::MessageNew(message) = event else { panic!("expected message:new") };
        assert_eq!(message.id, 11);
        assert_eq!(message.room_id, 2);
        assert!(!message.is_read);
        assert_eq!(message.sender.unwrap().name, "Aysel");
    }

    #[test]
    fn test_decode_notification_kind() {
        let data = json!({
            "id": 1,
            "type": "TASK_DEADLINE",
            "message": "Task due soon",
            "taskId": 42,
            "createdAt": "2026-01-05T10:00:00Z"
        });
        let ServerEvent::NotificationNew(n) = ServerEvent::from_wire("notification:new", data).unwrap() else {
            panic!("expected notification")
        };
        assert_eq!(n.kind, NotificationKind::TaskDeadline);
        assert_eq!(n.task_id, Some(42));
    }

    #[test]
    fn test_unknown_and_error_events() {
        assert_eq!(
            ServerEvent::from_wire("typing", Value::Null).unwrap(),
            ServerEvent::Unknown { name: "typing".to_string() }
        );
        assert_eq!(
            ServerEvent::from_wire("message:error", json!({})).unwrap(),
            ServerEvent::MessageError { message: "Mesaj göndərilmədi".to_string() }
        );
        assert!(ServerEvent::from_wire("user:online", json!({"id": 1})).is_err());
    }
}
