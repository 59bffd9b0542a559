//! Task Details Panel
//!
//! Markdown description with an edit mode, plus the task's activity history.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::activity_log;
use crate::commands::task::{self, TaskArgs};
use crate::components::ActivityEntry;
use crate::context::AppContext;
use crate::format::{format_due, parse_local_datetime, to_input_value};
use crate::markdown::render_markdown;
use crate::models::{ActivityLog, Task};
use crate::query::{CacheTag, Mutation};

#[component]
pub fn TaskDetails(task: Signal<Option<Task>>, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let log_version = ctx.version(CacheTag::ActivityLog);

    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let (due_draft, set_due_draft) = signal(String::new());
    let history = RwSignal::new(Vec::<ActivityLog>::new());

    let task_id = Memo::new(move |_| task.with(|t| t.as_ref().map(|t| t.id)));

    Effect::new(move |_| {
        let _ = log_version.get();
        let Some(id) = task_id.get() else { return };
        spawn_local(async move {
            match activity_log::list_for_task(id).await {
                Ok(entries) => history.set(entries),
                Err(e) => ctx.report("load task history", &e),
            }
        });
    });

    let start_edit = move |_| {
        let Some(current) = task.get_untracked() else { return };
        set_draft.set(current.description.unwrap_or_default());
        set_due_draft.set(to_input_value(current.due_at));
        set_editing.set(true);
    };

    let save = move |_| {
        let Some(current) = task.get_untracked() else { return };
        let mut args = TaskArgs::from(&current);
        let description = draft.get_untracked();
        args.description = (!description.trim().is_empty()).then_some(description);
        args.due_at = parse_local_datetime(&due_draft.get_untracked());
        if let Err(e) = args.validate() {
            ctx.toast_error(e.user_message());
            return;
        }
        set_editing.set(false);
        ctx.mutate("update task", Mutation::UpdateTask, async move { task::update_task(current.id, &args).await });
    };

    view! {
        <aside class="task-details">
            <div class="details-header">
                <h3>{move || task.with(|t| t.as_ref().map(|t| t.title.clone()).unwrap_or_default())}</h3>
                <button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
            </div>
            <p class="details-due">
                "Son tarix: " {move || format_due(task.with(|t| t.as_ref().and_then(|t| t.due_at)))}
            </p>
            {move || {
                task.with(|t| t.as_ref().and_then(|t| t.link.clone())).map(|link| {
                    let href = link.clone();
                    view! { <a class="details-link" href=href target="_blank" rel="noopener">{link}</a> }
                })
            }}
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <div
                            class="markdown-body"
                            on:dblclick=start_edit
                            inner_html=move || {
                                task.with(|t| {
                                    t.as_ref()
                                        .and_then(|t| t.description.as_deref())
                                        .map(render_markdown)
                                        .unwrap_or_default()
                                })
                            }
                        ></div>
                        <button class="edit-btn" on:click=start_edit>"Redaktə et"</button>
                    }
                }
            >
                <textarea
                    class="description-editor"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                ></textarea>
                <input
                    type="datetime-local"
                    prop:value=move || due_draft.get()
                    on:input=move |ev| set_due_draft.set(event_target_value(&ev))
                />
                <div class="editor-actions">
                    <button on:click=save>"Yadda saxla"</button>
                    <button class="cancel-btn" on:click=move |_| set_editing.set(false)>"Ləğv et"</button>
                </div>
            </Show>
            <h4>"Fəaliyyət"</h4>
            <ul class="activity-list">
                <For
                    each=move || history.get()
                    key=|entry| entry.id
                    children=|entry| view! { <ActivityEntry entry=entry /> }
                />
            </ul>
        </aside>
    }
}
