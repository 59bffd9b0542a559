//! Notification Feed
//!
//! `/notifications` namespace: deadline reminders and assignment notices.

use leptos::prelude::*;
use taskhub_realtime::{ServerEvent, SocketEvent, NOTIFICATIONS_NAMESPACE};
use tracing::{debug, info};

use super::SocketHandle;
use crate::config::config;
use crate::context::AppContext;
use crate::query::CacheTag;

#[derive(Clone, Copy)]
pub struct NotificationFeed {
    socket: StoredValue<SocketHandle, LocalStorage>,
    ctx: AppContext,
}

impl NotificationFeed {
    pub fn new(ctx: AppContext) -> Self {
        let settings = config();
        let socket = SocketHandle::new(&settings.socket_base_url, NOTIFICATIONS_NAMESPACE, settings.reconnect);
        let feed = Self { socket: StoredValue::new_local(socket.clone()), ctx };
        socket.subscribe(move |event| feed.handle_event(event));
        feed
    }

    pub fn start(&self, token: &str) {
        self.socket.get_value().connect(token);
    }

    pub fn stop(&self) {
        self.socket.get_value().disconnect();
    }

    fn handle_event(&self, event: &SocketEvent) {
        match event {
            SocketEvent::Server(ServerEvent::TaskDueReminder(reminder)) => {
                info!(task_id = reminder.task_id, "due reminder pushed");
                self.ctx.toast_warning(format!("\"{}\" tapşırığının vaxtı yaxınlaşır", reminder.title));
                self.ctx.invalidate(&[CacheTag::Notification, CacheTag::Task]);
            }
            SocketEvent::Server(ServerEvent::NotificationNew(notification)) => {
                self.ctx.toast_info(notification.message.clone());
                self.ctx.invalidate(&[CacheTag::Notification]);
            }
            SocketEvent::Connected => self.ctx.invalidate(&[CacheTag::Notification]),
            other => debug!(?other, "unhandled notification event"),
        }
    }
}

pub fn use_notifications() -> NotificationFeed {
    expect_context::<NotificationFeed>()
}
