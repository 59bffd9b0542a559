//! Realtime
//!
//! Browser side of the socket namespaces.

pub mod chat;
pub mod notifications;
mod socket;

pub use chat::{use_chat, ChatSession, SendOutcome};
pub use notifications::{use_notifications, NotificationFeed};
pub use socket::SocketHandle;
