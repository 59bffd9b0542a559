//! TaskHub Realtime
//!
//! Socket glue shared by the chat panel and the notification feed:
//! - packet: Socket.IO v4 text framing over a raw WebSocket
//! - events: typed client/server events
//! - connection: per-namespace connection state machine with room membership
//! - cache: chat message cache with optimistic-send reconciliation
//! - send: placeholder insertion and the per-plan send action
//!
//! Nothing in here touches the browser. The UI crate supplies a `Transport`
//! backed by `web_sys::WebSocket` and drives timers itself.

mod error;
pub mod packet;
pub mod events;
pub mod connection;
pub mod cache;
pub mod send;

pub use error::{RealtimeError, RealtimeResult};
pub use events::{
    ChatMessage, ClientEvent, DueReminder, Notification, NotificationKind, ReadReceipt,
    ServerEvent, SocketEvent, UserSummary,
};
pub use connection::{
    ConnectionManager, ConnectionState, ReconnectPolicy, ReconnectStep, SendPlan, Transport,
};
pub use cache::{
    CachedMessage, MessageCache, MessageKey, ReconcileContext, ReconcileOutcome, Reconciliation,
};
pub use send::{begin_send, OptimisticSend, SendAction};

/// Chat namespace on the backend socket server
pub const CHAT_NAMESPACE: &str = "/chat";

/// Notification namespace on the backend socket server
pub const NOTIFICATIONS_NAMESPACE: &str = "/notifications";
