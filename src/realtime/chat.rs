//! Chat Session
//!
//! Glue between the `/chat` socket, the message cache signal and the rest of
//! the UI: optimistic sends, reconciliation, toasts and room-list refreshes.

use chrono::Utc;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskhub_realtime::{
    begin_send, ChatMessage, ClientEvent, ConnectionState, MessageCache, ReconcileContext, SendAction, ServerEvent,
    SocketEvent, CHAT_NAMESPACE,
};
use tracing::{debug, info, warn};

use super::SocketHandle;
use crate::commands;
use crate::config::config;
use crate::context::AppContext;
use crate::markdown::preview;
use crate::query::{CacheTag, Mutation};
use crate::store::{store_current_user_id, store_set_online, AppStore};

pub const NO_CONNECTION: &str = "WebSocket bağlantısı yoxdur";

/// What the input box should do after a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Emitted on a live connection
    Sent,
    /// Waiting for a forced reconnect; the placeholder stays either way
    Deferred,
    /// Never left the client; put the text back into the input
    RolledBack(String),
    /// Blank text or no signed-in user
    Ignored,
}

#[derive(Clone, Copy)]
pub struct ChatSession {
    socket: StoredValue<SocketHandle, LocalStorage>,
    pub cache: RwSignal<MessageCache>,
    pub connection: RwSignal<ConnectionState>,
    ctx: AppContext,
    store: AppStore,
}

impl ChatSession {
    pub fn new(ctx: AppContext, store: AppStore) -> Self {
        let settings = config();
        let socket = SocketHandle::new(&settings.socket_base_url, CHAT_NAMESPACE, settings.reconnect);
        let session = Self {
            socket: StoredValue::new_local(socket.clone()),
            cache: RwSignal::new(MessageCache::new()),
            connection: RwSignal::new(ConnectionState::Disconnected),
            ctx,
            store,
        };
        socket.subscribe(move |event| session.handle_event(event));
        session
    }

    fn socket(&self) -> SocketHandle {
        self.socket.get_value()
    }

    fn sync_state(&self) {
        self.connection.set(self.socket().state());
    }

    pub fn start(&self, token: &str) {
        self.socket().connect(token);
        self.sync_state();
    }

    /// Logout: close the socket and forget every cached room
    pub fn stop(&self) {
        self.socket().disconnect();
        self.cache.update(MessageCache::clear);
        self.ctx.focused_room.set(None);
        self.sync_state();
    }

    /// Idempotent; rooms joined before the connection is up are joined on connect
    pub fn join_rooms(&self, room_ids: impl IntoIterator<Item = u32>) {
        let socket = self.socket();
        for room_id in room_ids {
            socket.join_room(room_id);
        }
    }

    pub fn open_room(&self, room_id: u32) {
        self.ctx.focused_room.set(Some(room_id));
        self.join_rooms([room_id]);
        let session = *self;
        spawn_local(async move {
            match commands::chat::list_messages(room_id).await {
                Ok(messages) => session.cache.update(|cache| cache.load_room(room_id, messages)),
                Err(e) => {
                    session.ctx.report("load messages", &e);
                    return;
                }
            }
            session.mark_room_read(room_id).await;
        });
    }

    pub fn close_room(&self) {
        self.ctx.focused_room.set(None);
    }

    async fn mark_room_read(&self, room_id: u32) {
        if self.socket().emit(&ClientEvent::MarkRead { room_id }).is_err() {
            debug!(room_id, "read receipt not broadcast");
        }
        match commands::chat::mark_room_read(room_id).await {
            Ok(()) => self.ctx.apply(Mutation::MarkRoomRead(room_id)),
            Err(e) => warn!(room_id, error = %e, "mark read failed"),
        }
    }

    /// Optimistic send
    pub fn send(&self, room_id: u32, content: &str) -> SendOutcome {
        let Some(user_id) = store_current_user_id(&self.store) else {
            return SendOutcome::Ignored;
        };
        let socket = self.socket();
        let plan = socket.plan_send();

        let Some(Some(send)) =
            self.cache.try_update(|cache| begin_send(cache, plan, room_id, user_id, content, Utc::now()))
        else {
            return SendOutcome::Ignored;
        };
        let event = ClientEvent::SendMessage { room_id, content: send.content };

        match send.action {
            SendAction::Emit => {
                if let Err(e) = socket.emit(&event) {
                    warn!(room_id, error = %e, "message emit failed");
                    self.ctx.toast_error(NO_CONNECTION);
                }
                SendOutcome::Sent
            }
            SendAction::RetryAfter(delay) => {
                info!(room_id, "socket down, reconnecting before send");
                socket.force_reconnect();
                let session = *self;
                Timeout::new(delay.as_millis() as u32, move || {
                    if let Err(e) = session.socket().emit(&event) {
                        warn!(room_id, temp_id = %send.temp_id, error = %e, "delayed send failed");
                    }
                    session.sync_state();
                })
                .forget();
                SendOutcome::Deferred
            }
            SendAction::RolledBack(text) => {
                self.ctx.toast_error(NO_CONNECTION);
                SendOutcome::RolledBack(text)
            }
        }
    }

    fn handle_event(&self, event: &SocketEvent) {
        self.sync_state();
        match event {
            SocketEvent::Connected => self.ctx.invalidate(&[CacheTag::ChatRoom]),
            SocketEvent::Failed => warn!("chat socket unavailable, continuing without live updates"),
            SocketEvent::Server(server) => self.handle_server_event(server),
        }
    }

    fn handle_server_event(&self, event: &ServerEvent) {
        match event {
            ServerEvent::MessageNew(message) | ServerEvent::MessageSent(message) => self.receive(message.clone()),
            ServerEvent::MessageRead(receipt) => {
                self.cache.update(|cache| {
                    cache.mark_read(receipt.room_id, &receipt.message_ids);
                });
                self.ctx.invalidate(&[CacheTag::ChatRoom]);
            }
            ServerEvent::MessageError { message } => self.ctx.toast_error(message.clone()),
            ServerEvent::UserOnline { user_id } => store_set_online(&self.store, *user_id, true),
            ServerEvent::UserOffline { user_id } => store_set_online(&self.store, *user_id, false),
            other => debug!(?other, "unhandled chat event"),
        }
    }

    fn receive(&self, message: ChatMessage) {
        let reconcile_ctx = ReconcileContext {
            current_user_id: store_current_user_id(&self.store),
            focused_room: self.ctx.focused_room.get_untracked(),
        };
        let room_id = message.room_id;
        let own = reconcile_ctx.current_user_id == Some(message.sender_id);
        let sender = message.sender.as_ref().map(|s| s.name.clone()).unwrap_or_else(|| "Yeni mesaj".to_string());
        let text = preview(&message.content, 60);

        let Some(result) = self.cache.try_update(|cache| cache.reconcile(message, &reconcile_ctx)) else {
            return;
        };
        if result.toast {
            self.ctx.toast_info(format!("{}: {}", sender, text));
        }
        if !own && reconcile_ctx.focused_room == Some(room_id) {
            let session = *self;
            spawn_local(async move { session.mark_room_read(room_id).await });
        }
        if result.invalidate_rooms {
            self.ctx.invalidate(&[CacheTag::ChatRoom]);
        }
    }
}

pub fn use_chat() -> ChatSession {
    expect_context::<ChatSession>()
}
