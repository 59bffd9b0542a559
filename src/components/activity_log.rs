//! Activity Log Components

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::activity_log;
use crate::context::AppContext;
use crate::format::format_timestamp;
use crate::models::ActivityLog;
use crate::query::CacheTag;

#[component]
pub fn ActivityEntry(entry: ActivityLog) -> impl IntoView {
    let who = entry.user.as_ref().map(|u| u.full_name()).unwrap_or_else(|| "Sistem".to_string());

    view! {
        <li class="activity-entry">
            <span class="activity-time">{format_timestamp(entry.created_at)}</span>
            <span class="activity-user">{who}</span>
            <span class="activity-action">{entry.action}</span>
            {entry.details.map(|details| view! { <span class="activity-details">{details}</span> })}
        </li>
    }
}

/// Recent activity across all spaces
#[component]
pub fn ActivityFeed() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let version = ctx.version(CacheTag::ActivityLog);
    let entries = RwSignal::new(Vec::<ActivityLog>::new());

    Effect::new(move |_| {
        let _ = version.get();
        spawn_local(async move {
            match activity_log::list_recent().await {
                Ok(loaded) => entries.set(loaded),
                Err(e) => ctx.report("load activity", &e),
            }
        });
    });

    view! {
        <section class="activity-feed">
            <h2>"Son fəaliyyət"</h2>
            <Show when=move || entries.with(|e| e.is_empty())>
                <p class="empty-hint">"Hələ fəaliyyət yoxdur"</p>
            </Show>
            <ul class="activity-list">
                <For each=move || entries.get() key=|entry| entry.id children=|entry| view! { <ActivityEntry entry=entry /> } />
            </ul>
        </section>
    }
}
