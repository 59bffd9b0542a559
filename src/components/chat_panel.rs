//! Chat Panel Component
//!
//! Room list, message view and composer. Messages come from the shared
//! `MessageCache`; optimistic ones render with a pending style until the
//! server echo replaces them.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskhub_realtime::{CachedMessage, ConnectionState};

use crate::commands::chat::{self, CreateGroupArgs};
use crate::commands::user;
use crate::context::AppContext;
use crate::format::format_timestamp;
use crate::models::{ChatRoom, RoomKind};
use crate::query::{CacheTag, Mutation};
use crate::realtime::{use_chat, SendOutcome};
use crate::store::{store_current_user_id, use_app_store, AppStateStoreFields};

fn connection_label(state: ConnectionState) -> String {
    match state {
        ConnectionState::Connected => "Qoşulub".to_string(),
        ConnectionState::Connecting => "Qoşulur...".to_string(),
        ConnectionState::Reconnecting { attempt } => format!("Yenidən qoşulur ({})", attempt),
        ConnectionState::Disconnected => "Bağlantı yoxdur".to_string(),
        ConnectionState::Failed => "Bağlantı uğursuz oldu".to_string(),
    }
}

#[component]
pub fn ChatPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let chat = use_chat();
    let rooms_version = ctx.version(CacheTag::ChatRoom);
    let users_version = ctx.version(CacheTag::User);

    let rooms = RwSignal::new(Vec::<ChatRoom>::new());

    Effect::new(move |_| {
        let _ = rooms_version.get();
        spawn_local(async move {
            match chat::list_rooms().await {
                Ok(loaded) => {
                    chat.join_rooms(loaded.iter().map(|r| r.id));
                    rooms.set(loaded);
                }
                Err(e) => ctx.report("load rooms", &e),
            }
        });
    });

    Effect::new(move |_| {
        let _ = users_version.get();
        spawn_local(async move {
            match user::list_users().await {
                Ok(users) => store.users().set(users),
                Err(e) => ctx.report("load users", &e),
            }
        });
    });

    view! {
        <aside class="chat-panel">
            <div class="chat-header">
                <h3>"Mesajlar"</h3>
                <span class=move || {
                    if chat.connection.get() == ConnectionState::Connected { "conn-dot online" } else { "conn-dot" }
                }></span>
                <span class="conn-label">{move || connection_label(chat.connection.get())}</span>
            </div>
            <Show
                when=move || ctx.focused_room.get().is_some()
                fallback=move || view! {
                    <RoomList rooms=rooms />
                    <NewRoomForms />
                }
            >
                <RoomView rooms=rooms />
            </Show>
        </aside>
    }
}

#[component]
fn RoomList(rooms: RwSignal<Vec<ChatRoom>>) -> impl IntoView {
    let store = use_app_store();
    let chat = use_chat();

    view! {
        <ul class="room-list">
            <For
                each=move || rooms.get()
                key=|room| (room.id, room.unread_count, room.last_message.as_ref().map(|m| m.created_at))
                children=move |room| {
                    let room_id = room.id;
                    let me = store_current_user_id(&store);
                    let name = room.display_name(me);
                    let peer = match room.kind {
                        RoomKind::Direct => room.members.iter().find(|m| Some(m.id) != me).map(|m| m.id),
                        RoomKind::Group => None,
                    };
                    let is_online = move || peer.is_some_and(|id| store.online_users().with(|set| set.contains(&id)));
                    let last = room.last_message.as_ref().map(|m| m.content.clone()).unwrap_or_default();
                    let unread = room.unread_count;
                    view! {
                        <li class="room-item" on:click=move |_| chat.open_room(room_id)>
                            <Show when=move || peer.is_some()>
                                <span class=move || if is_online() { "presence online" } else { "presence" }></span>
                            </Show>
                            <span class="room-name">{name}</span>
                            <span class="room-last">{last}</span>
                            {(unread > 0).then(|| view! { <span class="badge">{unread}</span> })}
                        </li>
                    }
                }
            />
        </ul>
    }
}

#[component]
fn RoomView(rooms: RwSignal<Vec<ChatRoom>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let chat = use_chat();
    let (draft, set_draft) = signal(String::new());

    let title = move || {
        let me = store_current_user_id(&store);
        let room_id = ctx.focused_room.get();
        rooms.with(|all| all.iter().find(|r| Some(r.id) == room_id).map(|r| r.display_name(me)).unwrap_or_default())
    };

    let messages = move || -> Vec<CachedMessage> {
        let Some(room_id) = ctx.focused_room.get() else { return Vec::new() };
        chat.cache.with(|cache| cache.messages(room_id).to_vec())
    };

    let send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(room_id) = ctx.focused_room.get_untracked() else { return };
        match chat.send(room_id, &draft.get_untracked()) {
            SendOutcome::Sent | SendOutcome::Deferred => set_draft.set(String::new()),
            SendOutcome::RolledBack(text) => set_draft.set(text),
            SendOutcome::Ignored => {}
        }
    };

    view! {
        <div class="room-view">
            <div class="room-header">
                <button class="back-btn" on:click=move |_| chat.close_room()>"←"</button>
                <span class="room-title">{title}</span>
            </div>
            <div class="message-list">
                <For
                    each=messages
                    key=|message| (message.key.clone(), message.is_read)
                    children=move |message| {
                        let own = store_current_user_id(&store) == Some(message.sender_id);
                        let mut class = String::from("message");
                        if own {
                            class.push_str(" own");
                        }
                        if message.is_optimistic() {
                            class.push_str(" pending");
                        }
                        let read_mark = own && message.is_read;
                        view! {
                            <div class=class>
                                {(!own).then(|| view! {
                                    <span class="message-sender">{message.sender_name.clone().unwrap_or_default()}</span>
                                })}
                                <span class="message-content">{message.content.clone()}</span>
                                <span class="message-time">
                                    {format_timestamp(message.created_at)}
                                    {read_mark.then_some(" ✓✓")}
                                </span>
                            </div>
                        }
                    }
                />
            </div>
            <form class="composer" on:submit=send>
                <input
                    type="text"
                    placeholder="Mesaj yazın..."
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button type="submit">"Göndər"</button>
            </form>
        </div>
    }
}

/// Start a direct chat or create a group
#[component]
fn NewRoomForms() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let chat = use_chat();
    let (group_name, set_group_name) = signal(String::new());
    let members = RwSignal::new(HashSet::<u32>::new());

    let others = move || {
        let me = store_current_user_id(&store);
        store.users().get().into_iter().filter(|u| Some(u.id) != me).collect::<Vec<_>>()
    };

    let open_direct = move |ev: web_sys::Event| {
        let Ok(user_id) = event_target_value(&ev).parse::<u32>() else { return };
        spawn_local(async move {
            match chat::open_direct_room(user_id).await {
                Ok(room) => {
                    ctx.apply(Mutation::OpenDirectRoom);
                    chat.open_room(room.id);
                }
                Err(e) => ctx.report("open direct room", &e),
            }
        });
    };

    let create_group = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let args = CreateGroupArgs {
            name: group_name.get_untracked().trim().to_string(),
            member_ids: members.with_untracked(|m| m.iter().copied().collect()),
        };
        if let Err(e) = args.validate() {
            ctx.toast_error(e.user_message());
            return;
        }
        spawn_local(async move {
            match chat::create_group_room(&args).await {
                Ok(room) => {
                    set_group_name.set(String::new());
                    members.set(HashSet::new());
                    ctx.apply(Mutation::CreateGroupRoom);
                    chat.open_room(room.id);
                }
                Err(e) => ctx.report("create group", &e),
            }
        });
    };

    view! {
        <div class="new-room">
            <select class="direct-select" on:change=open_direct>
                <option value="" selected=true>"Şəxsi söhbət başlat..."</option>
                {move || {
                    others()
                        .into_iter()
                        .map(|u| view! { <option value=u.id.to_string()>{u.full_name()}</option> })
                        .collect_view()
                }}
            </select>
            <form class="group-form" on:submit=create_group>
                <input
                    type="text"
                    placeholder="Qrup adı"
                    prop:value=move || group_name.get()
                    on:input=move |ev| set_group_name.set(event_target_value(&ev))
                />
                <div class="member-picker">
                    {move || {
                        others()
                            .into_iter()
                            .map(|u| {
                                let id = u.id;
                                view! {
                                    <label class="member-option">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || members.with(|m| m.contains(&id))
                                            on:change=move |_| members.update(|m| {
                                                if !m.remove(&id) {
                                                    m.insert(id);
                                                }
                                            })
                                        />
                                        {u.full_name()}
                                    </label>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <button type="submit">"Qrup yarat"</button>
            </form>
        </div>
    }
}
