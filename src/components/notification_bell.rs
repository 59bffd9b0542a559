//! Notification Bell Component
//!
//! Unread badge plus a dropdown; refreshed whenever the `Notification` tag
//! is bumped by the socket feed or a read.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::notification;
use crate::context::AppContext;
use crate::format::format_timestamp;
use crate::models::Notification;
use crate::query::{CacheTag, Mutation};

#[component]
pub fn NotificationBell() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let version = ctx.version(CacheTag::Notification);
    let items = RwSignal::new(Vec::<Notification>::new());
    let (open, set_open) = signal(false);

    Effect::new(move |_| {
        let _ = version.get();
        spawn_local(async move {
            match notification::list_notifications().await {
                Ok(loaded) => items.set(loaded),
                Err(e) => ctx.report("load notifications", &e),
            }
        });
    });

    let unread = move || items.with(|all| all.iter().filter(|n| !n.is_read).count());

    let mark_all = move |_| {
        ctx.mutate("mark all read", Mutation::MarkNotificationRead, notification::mark_all_notifications_read());
    };

    view! {
        <div class="notification-bell">
            <button class="bell-btn" on:click=move |_| set_open.update(|o| *o = !*o)>
                "🔔"
                <Show when=move || { unread() > 0 }>
                    <span class="badge">{unread}</span>
                </Show>
            </button>
            <Show when=move || open.get()>
                <div class="notification-dropdown">
                    <div class="dropdown-header">
                        <span>"Bildirişlər"</span>
                        <button class="link-btn" on:click=mark_all>"Hamısını oxunmuş et"</button>
                    </div>
                    <Show when=move || items.with(|all| all.is_empty())>
                        <p class="empty-hint">"Bildiriş yoxdur"</p>
                    </Show>
                    <ul>
                        <For
                            each=move || items.get()
                            key=|n| (n.id, n.is_read)
                            children=move |n| {
                                let id = n.id;
                                let is_read = n.is_read;
                                view! {
                                    <li
                                        class=if is_read { "notification read" } else { "notification unread" }
                                        on:click=move |_| {
                                            if !is_read {
                                                ctx.mutate(
                                                    "mark notification read",
                                                    Mutation::MarkNotificationRead,
                                                    notification::mark_notification_read(id),
                                                );
                                            }
                                        }
                                    >
                                        <span class="notification-message">{n.message}</span>
                                        <span class="notification-time">{format_timestamp(n.created_at)}</span>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </Show>
        </div>
    }
}
