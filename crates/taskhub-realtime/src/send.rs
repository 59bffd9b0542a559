//! Optimistic Send
//!
//! Decides what happens to a typed message before any I/O: the placeholder
//! goes into the cache first, then the connection plan picks the action.
//! Only a send that never had a connection to wait for is rolled back; a
//! deferred send keeps its placeholder until the echo confirms it.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::MessageCache;
use crate::connection::SendPlan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendAction {
    /// Emit right away
    Emit,
    /// Reconnect, then emit once after the delay; the placeholder stays
    RetryAfter(Duration),
    /// Placeholder removed; the text goes back into the input
    RolledBack(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticSend {
    pub room_id: u32,
    pub temp_id: String,
    pub content: String,
    pub action: SendAction,
}

/// Insert the placeholder and map the plan to an action.
/// `None` for blank text; nothing is cached then.
pub fn begin_send(
    cache: &mut MessageCache,
    plan: SendPlan,
    room_id: u32,
    sender_id: u32,
    content: &str,
    now: DateTime<Utc>,
) -> Option<OptimisticSend> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    let temp_id = cache.insert_optimistic(room_id, sender_id, content, now);

    let action = match plan {
        SendPlan::Emit => SendAction::Emit,
        SendPlan::ReconnectThenEmit(delay) => SendAction::RetryAfter(delay),
        SendPlan::Rollback => {
            cache.rollback(room_id, &temp_id);
            SendAction::RolledBack(content.to_string())
        }
    };

    Some(OptimisticSend { room_id, temp_id, content: content.to_string(), action })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_connected_send_emits_with_placeholder() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![]);

        let send = begin_send(&mut cache, SendPlan::Emit, 1, 7, " salam ", now()).unwrap();

        assert_eq!(send.action, SendAction::Emit);
        assert_eq!(send.content, "salam");
        assert_eq!(cache.pending_count(1), 1);
        assert_eq!(cache.messages(1)[0].temp_id(), Some(send.temp_id.as_str()));
    }

    #[test]
    fn test_retry_keeps_placeholder() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![]);

        let send = begin_send(&mut cache, SendPlan::ReconnectThenEmit(Duration::from_secs(1)), 1, 7, "salam", now())
            .unwrap();

        assert_eq!(send.action, SendAction::RetryAfter(Duration::from_secs(1)));
        assert_eq!(cache.pending_count(1), 1);
        assert_eq!(cache.messages(1)[0].content, "salam");
    }

    #[test]
    fn test_no_connection_rolls_back_and_returns_text() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![]);

        let send = begin_send(&mut cache, SendPlan::Rollback, 1, 7, "salam", now()).unwrap();

        assert_eq!(send.action, SendAction::RolledBack("salam".to_string()));
        assert_eq!(cache.pending_count(1), 0);
        assert!(cache.messages(1).is_empty());
    }

    #[test]
    fn test_blank_text_caches_nothing() {
        let mut cache = MessageCache::new();
        cache.load_room(1, vec![]);

        assert_eq!(begin_send(&mut cache, SendPlan::Emit, 1, 7, "   ", now()), None);
        assert!(cache.messages(1).is_empty());
    }
}
