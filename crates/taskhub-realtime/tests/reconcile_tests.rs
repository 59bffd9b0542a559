//! Chat Reconciliation Tests
//!
//! Optimistic send followed by a synthetic `message:new`.

use chrono::{DateTime, TimeZone, Utc};
use taskhub_realtime::{
    ChatMessage, MessageCache, MessageKey, ReconcileContext, ReconcileOutcome, UserSummary,
};

const ME: u32 = 7;
const OTHER: u32 = 9;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_767_225_600 + secs, 0).unwrap()
}

fn server_message(id: u32, room_id: u32, sender_id: u32, content: &str) -> ChatMessage {
    ChatMessage {
        id,
        room_id,
        sender_id,
        content: content.to_string(),
        created_at: at(60),
        is_read: false,
        sender: Some(UserSummary { id: sender_id, name: format!("user-{}", sender_id), avatar: None }),
    }
}

fn ctx(focused_room: Option<u32>) -> ReconcileContext {
    ReconcileContext { current_user_id: Some(ME), focused_room }
}

#[test]
fn test_own_confirmation_replaces_placeholder_in_place() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![server_message(1, 1, OTHER, "salam")]);
    let temp_id = cache.insert_optimistic(1, ME, "necəsən?", at(10));
    let before = cache.messages(1).len();

    let result = cache.reconcile(server_message(2, 1, ME, "necəsən?"), &ctx(Some(1)));

    assert_eq!(result.outcome, ReconcileOutcome::ReplacedOptimistic { temp_id: temp_id.clone() });
    assert!(!result.toast);
    assert!(result.invalidate_rooms);
    assert_eq!(cache.messages(1).len(), before);
    assert!(cache.messages(1).iter().all(|m| m.temp_id() != Some(temp_id.as_str())));
    assert_eq!(cache.messages(1)[1].key, MessageKey::Confirmed(2));
}

#[test]
fn test_duplicate_confirmation_is_ignored() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    cache.insert_optimistic(1, ME, "ok", at(1));

    cache.reconcile(server_message(5, 1, ME, "ok"), &ctx(Some(1)));
    let again = cache.reconcile(server_message(5, 1, ME, "ok"), &ctx(Some(1)));

    assert_eq!(again.outcome, ReconcileOutcome::Duplicate);
    assert!(again.invalidate_rooms);
    assert_eq!(cache.messages(1).len(), 1);
}

#[test]
fn test_refetch_then_echo_leaves_no_placeholder() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    cache.insert_optimistic(1, ME, "salam", at(1));

    cache.load_room(1, vec![server_message(5, 1, ME, "salam")]);
    assert_eq!(cache.pending_count(1), 0);
    assert_eq!(cache.messages(1).len(), 1);

    let echo = cache.reconcile(server_message(5, 1, ME, "salam"), &ctx(Some(1)));
    assert_eq!(echo.outcome, ReconcileOutcome::Duplicate);
    assert_eq!(cache.pending_count(1), 0);
    assert_eq!(cache.messages(1).len(), 1);
}

#[test]
fn test_late_duplicate_does_not_eat_a_new_placeholder() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![server_message(5, 1, ME, "ok")]);
    let resent = cache.insert_optimistic(1, ME, "ok", at(90));

    let late = cache.reconcile(server_message(5, 1, ME, "ok"), &ctx(Some(1)));
    assert_eq!(late.outcome, ReconcileOutcome::Duplicate);
    assert_eq!(cache.pending_count(1), 1);

    let echo = cache.reconcile(server_message(6, 1, ME, "ok"), &ctx(Some(1)));
    assert_eq!(echo.outcome, ReconcileOutcome::ReplacedOptimistic { temp_id: resent });
    assert_eq!(cache.pending_count(1), 0);
}

#[test]
fn test_newest_matching_placeholder_wins() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    let older = cache.insert_optimistic(1, ME, "same", at(1));
    let newer = cache.insert_optimistic(1, ME, "same", at(2));

    let first = cache.reconcile(server_message(10, 1, ME, "same"), &ctx(Some(1)));
    assert_eq!(first.outcome, ReconcileOutcome::ReplacedOptimistic { temp_id: newer });

    let second = cache.reconcile(server_message(11, 1, ME, "same"), &ctx(Some(1)));
    assert_eq!(second.outcome, ReconcileOutcome::ReplacedOptimistic { temp_id: older });

    assert_eq!(cache.pending_count(1), 0);
    assert_eq!(cache.messages(1).len(), 2);
}

#[test]
fn test_own_message_without_placeholder_is_appended() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    cache.insert_optimistic(1, ME, "draft one", at(1));

    let result = cache.reconcile(server_message(3, 1, ME, "sent from phone"), &ctx(Some(1)));

    assert_eq!(result.outcome, ReconcileOutcome::Appended);
    assert_eq!(cache.messages(1).len(), 2);
    assert_eq!(cache.pending_count(1), 1);
}

#[test]
fn test_foreign_message_toasts_only_outside_focused_room() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    cache.load_room(2, vec![]);

    let focused = cache.reconcile(server_message(1, 1, OTHER, "hey"), &ctx(Some(1)));
    assert_eq!(focused.outcome, ReconcileOutcome::Appended);
    assert!(!focused.toast);

    let elsewhere = cache.reconcile(server_message(2, 2, OTHER, "hey"), &ctx(Some(1)));
    assert_eq!(elsewhere.outcome, ReconcileOutcome::Appended);
    assert!(elsewhere.toast);
}

#[test]
fn test_foreign_message_with_same_content_does_not_consume_placeholder() {
    let mut cache = MessageCache::new();
    cache.load_room(1, vec![]);
    cache.insert_optimistic(1, ME, "ok", at(1));

    cache.reconcile(server_message(4, 1, OTHER, "ok"), &ctx(Some(1)));
    assert_eq!(cache.pending_count(1), 1);
    assert_eq!(cache.messages(1).len(), 2);
}

#[test]
fn test_unloaded_room_still_toasts_and_invalidates() {
    let mut cache = MessageCache::new();
    let result = cache.reconcile(server_message(1, 42, OTHER, "ping"), &ctx(None));

    assert_eq!(result.outcome, ReconcileOutcome::RoomNotLoaded);
    assert!(result.toast);
    assert!(result.invalidate_rooms);
    assert!(!cache.is_loaded(42));
}
