//! Chat Message Cache
//!
//! Per-room message lists mirrored from the REST API, plus the optimistic
//! entries the user typed but the server has not confirmed yet.
//!
//! Confirmation is matched on sender + identical content, picking the newest
//! pending entry. Two identical messages sent back to back can therefore be
//! confirmed in swapped order; the visible list is the same either way.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::events::ChatMessage;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Confirmed(u32),
    Optimistic(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedMessage {
    pub key: MessageKey,
    pub room_id: u32,
    pub sender_id: u32,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl CachedMessage {
    fn confirmed(message: ChatMessage) -> Self {
        Self {
            key: MessageKey::Confirmed(message.id),
            room_id: message.room_id,
            sender_id: message.sender_id,
            sender_name: message.sender.map(|s| s.name),
            content: message.content,
            created_at: message.created_at,
            is_read: message.is_read,
        }
    }

    pub fn is_optimistic(&self) -> bool {
        matches!(self.key, MessageKey::Optimistic(_))
    }

    pub fn server_id(&self) -> Option<u32> {
        match self.key {
            MessageKey::Confirmed(id) => Some(id),
            MessageKey::Optimistic(_) => None,
        }
    }

    pub fn temp_id(&self) -> Option<&str> {
        match &self.key {
            MessageKey::Optimistic(temp_id) => Some(temp_id),
            MessageKey::Confirmed(_) => None,
        }
    }
}

/// Who is looking at the chat right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileContext {
    pub current_user_id: Option<u32>,
    pub focused_room: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Server id already cached
    Duplicate,
    /// Pending entry swapped in place for the confirmed message
    ReplacedOptimistic { temp_id: String },
    Appended,
    /// Room list not loaded, nothing stored
    RoomNotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub outcome: ReconcileOutcome,
    /// Show a toast for a foreign message outside the focused room
    pub toast: bool,
    /// Room list must be refetched (unread counters live on the server)
    pub invalidate_rooms: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MessageCache {
    rooms: HashMap<u32, Vec<CachedMessage>>,
    temp_seq: u64,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, room_id: u32) -> bool {
        self.rooms.contains_key(&room_id)
    }

    pub fn messages(&self, room_id: u32) -> &[CachedMessage] {
        self.rooms.get(&room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pending_count(&self, room_id: u32) -> usize {
        self.messages(room_id).iter().filter(|m| m.is_optimistic()).count()
    }

    /// Replace a room's confirmed history with a fresh server fetch
    ///
    /// Pending optimistic entries survive at the tail, except those the fetch
    /// already confirms. Each message new to this room consumes at most one
    /// placeholder with the same sender and content.
    pub fn load_room(&mut self, room_id: u32, messages: Vec<ChatMessage>) {
        let (known, mut pending): (Vec<CachedMessage>, Vec<CachedMessage>) =
            self.rooms.remove(&room_id).unwrap_or_default().into_iter().partition(|m| !m.is_optimistic());
        let known: HashSet<u32> = known.iter().filter_map(CachedMessage::server_id).collect();

        for message in messages.iter().filter(|m| !known.contains(&m.id)) {
            if let Some(index) = newest_placeholder(&pending, message.sender_id, &message.content) {
                let confirmed = pending.remove(index);
                debug!(room_id, id = message.id, temp_id = ?confirmed.temp_id(), "placeholder confirmed by fetch");
            }
        }

        let mut entries: Vec<CachedMessage> = messages.into_iter().map(CachedMessage::confirmed).collect();
        entries.extend(pending);
        self.rooms.insert(room_id, entries);
    }

    pub fn unload_room(&mut self, room_id: u32) {
        self.rooms.remove(&room_id);
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }

    /// Append a local placeholder; returns its temporary id
    pub fn insert_optimistic(
        &mut self,
        room_id: u32,
        sender_id: u32,
        content: &str,
        now: DateTime<Utc>,
    ) -> String {
        self.temp_seq += 1;
        let temp_id = format!("temp-{}-{}", now.timestamp_millis(), self.temp_seq);
        self.rooms.entry(room_id).or_default().push(CachedMessage {
            key: MessageKey::Optimistic(temp_id.clone()),
            room_id,
            sender_id,
            sender_name: None,
            content: content.to_string(),
            created_at: now,
            is_read: true,
        });
        temp_id
    }

    /// Remove a placeholder after a send that never left the client
    pub fn rollback(&mut self, room_id: u32, temp_id: &str) -> Option<CachedMessage> {
        let entries = self.rooms.get_mut(&room_id)?;
        let index = entries.iter().position(|m| m.temp_id() == Some(temp_id))?;
        Some(entries.remove(index))
    }

    /// Merge a server-confirmed message into the cache
    pub fn reconcile(&mut self, message: ChatMessage, ctx: &ReconcileContext) -> Reconciliation {
        let own = ctx.current_user_id == Some(message.sender_id);
        let room_id = message.room_id;

        let outcome = match self.rooms.get_mut(&room_id) {
            None => ReconcileOutcome::RoomNotLoaded,
            Some(entries) if entries.iter().any(|m| m.key == MessageKey::Confirmed(message.id)) => {
                ReconcileOutcome::Duplicate
            }
            Some(entries) if own => match newest_placeholder(entries, message.sender_id, &message.content) {
                Some(index) => {
                    let placeholder = std::mem::replace(&mut entries[index], CachedMessage::confirmed(message));
                    let temp_id = placeholder.temp_id().unwrap_or_default().to_string();
                    ReconcileOutcome::ReplacedOptimistic { temp_id }
                }
                None => {
                    entries.push(CachedMessage::confirmed(message));
                    ReconcileOutcome::Appended
                }
            },
            Some(entries) => {
                entries.push(CachedMessage::confirmed(message));
                ReconcileOutcome::Appended
            }
        };

        let toast = !own && ctx.focused_room != Some(room_id) && outcome != ReconcileOutcome::Duplicate;
        debug!(room_id, ?outcome, toast, "reconciled message");

        Reconciliation { outcome, toast, invalidate_rooms: true }
    }

    /// Apply a read receipt; an empty id list marks the whole room
    pub fn mark_read(&mut self, room_id: u32, message_ids: &[u32]) -> usize {
        let Some(entries) = self.rooms.get_mut(&room_id) else {
            return 0;
        };
        let mut changed = 0;
        for entry in entries.iter_mut().filter(|m| !m.is_read) {
            let matches = match entry.server_id() {
                Some(id) => message_ids.is_empty() || message_ids.contains(&id),
                None => false,
            };
            if matches {
                entry.is_read = true;
                changed += 1;
            }
        }
        changed
    }
}

/// Index of the newest pending entry from `sender_id` with this exact text
fn newest_placeholder(entries: &[CachedMessage], sender_id: u32, content: &str) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_optimistic() && m.sender_id == sender_id && m.content == content)
        .max_by_key(|(_, m)| m.created_at)
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_767_000_000 + secs, 0).unwrap()
    }

    fn confirmed(id: u32, room_id: u32, sender_id: u32, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            room_id,
            sender_id,
            content: content.to_string(),
            created_at: at(100),
            is_read: false,
            sender: None,
        }
    }

    #[test]
    fn test_rollback_removes_only_that_placeholder() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![]);
        let a = cache.insert_optimistic(1, 7, "a", at(1));
        let _b = cache.insert_optimistic(1, 7, "b", at(2));

        let removed = cache.rollback(1, &a).unwrap();
        assert_eq!(removed.content, "a");
        assert_eq!(cache.messages(1).len(), 1);
        assert!(cache.rollback(1, &a).is_none());
    }

    #[test]
    fn test_load_room_keeps_pending_tail() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![confirmed(1, 1, 2, "old")]);
        cache.insert_optimistic(1, 7, "typing", at(5));
        cache.load_room(1, vec![confirmed(1, 1, 2, "old"), confirmed(2, 1, 2, "new")]);

        let contents: Vec<&str> = cache.messages(1).iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["old", "new", "typing"]);
        assert_eq!(cache.pending_count(1), 1);
    }

    #[test]
    fn test_load_room_ignores_history_it_already_had() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![confirmed(1, 1, 7, "ok")]);
        cache.insert_optimistic(1, 7, "ok", at(5));

        cache.load_room(1, vec![confirmed(1, 1, 7, "ok")]);
        assert_eq!(cache.pending_count(1), 1);

        cache.load_room(1, vec![confirmed(1, 1, 7, "ok"), confirmed(2, 1, 7, "ok")]);
        assert_eq!(cache.pending_count(1), 0);
        assert_eq!(cache.messages(1).len(), 2);
    }

    #[test]
    fn test_mark_read() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![confirmed(1, 1, 2, "a"), confirmed(2, 1, 2, "b")]);
        assert_eq!(cache.mark_read(1, &[2]), 1);
        assert_eq!(cache.mark_read(1, &[]), 1);
        assert_eq!(cache.mark_read(9, &[]), 0);
    }
}
