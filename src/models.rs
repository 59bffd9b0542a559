//! Frontend Models
//!
//! Data structures matching backend entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use taskhub_realtime::{ChatMessage, Notification, NotificationKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.surname {
            Some(surname) if !surname.is_empty() => format!("{} {}", self.name, surname),
            _ => self.name.clone(),
        }
    }
}

/// Top-level container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub task_lists: Vec<TaskList>,
    #[serde(default)]
    pub assignees: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: u32,
    pub name: String,
    pub space_id: u32,
    #[serde(default)]
    pub task_lists: Vec<TaskList>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub position: i32,
}

/// Owner of a task list: a space or a folder, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListParent {
    Space(u32),
    Folder(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub space_id: Option<u32>,
    #[serde(default)]
    pub folder_id: Option<u32>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub position: i32,
}

impl TaskList {
    /// Folder wins if the server ever sends both
    pub fn parent(&self) -> Option<ListParent> {
        match (self.folder_id, self.space_id) {
            (Some(folder_id), _) => Some(ListParent::Folder(folder_id)),
            (None, Some(space_id)) => Some(ListParent::Space(space_id)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub task_list_id: u32,
    #[serde(default)]
    pub parent_id: Option<u32>,
    #[serde(default)]
    pub status_id: Option<u32>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub link: Option<String>,
    /// Deadline reminder already delivered (server-side flag)
    #[serde(default)]
    pub message_sent: bool,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: u32,
    pub action: String,
    #[serde(default)]
    pub task_id: Option<u32>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrashKind {
    Space,
    Folder,
    TaskList,
    Task,
}

impl TrashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrashKind::Space => "space",
            TrashKind::Folder => "folder",
            TrashKind::TaskList => "task-list",
            TrashKind::Task => "task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: TrashKind,
    pub name: String,
    pub deleted_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_by: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomKind {
    Direct,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub sender_id: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub unread_count: u32,
}

impl ChatRoom {
    /// Group name, or the other participant for direct rooms
    pub fn display_name(&self, current_user_id: Option<u32>) -> String {
        match self.kind {
            RoomKind::Group => self.name.clone().unwrap_or_else(|| format!("Qrup #{}", self.id)),
            RoomKind::Direct => self
                .members
                .iter()
                .find(|m| Some(m.id) != current_user_id)
                .map(User::full_name)
                .unwrap_or_else(|| format!("Otaq #{}", self.id)),
        }
    }
}

/// Login / register response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u32, name: &str) -> User {
        User { id, name: name.to_string(), surname: None, email: format!("{}@mail.az", name), avatar: None }
    }

    #[test]
    fn test_task_list_parent_is_exclusive() {
        let mut list = TaskList {
            id: 1,
            name: "Backlog".to_string(),
            space_id: Some(3),
            folder_id: None,
            is_archived: false,
            position: 0,
        };
        assert_eq!(list.parent(), Some(ListParent::Space(3)));
        list.folder_id = Some(8);
        assert_eq!(list.parent(), Some(ListParent::Folder(8)));
    }

    #[test]
    fn test_direct_room_shows_other_member() {
        let room = ChatRoom {
            id: 4,
            kind: RoomKind::Direct,
            name: None,
            members: vec![user(1, "Leyla"), user(2, "Murad")],
            last_message: None,
            unread_count: 0,
        };
        assert_eq!(room.display_name(Some(1)), "Murad");
        assert_eq!(room.display_name(Some(2)), "Leyla");
    }

    #[test]
    fn test_task_deserializes_with_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"id":5,"title":"Write report","taskListId":2,"dueAt":"2026-03-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.parent_id, None);
        assert!(!task.message_sent);
        assert!(task.due_at.is_some());
    }

    #[test]
    fn test_auth_response_accepts_access_token() {
        let auth: AuthResponse = serde_json::from_str(r#"{"accessToken":"abc"}"#).unwrap();
        assert_eq!(auth.token, "abc");
        assert!(auth.user.is_none());
    }
}
