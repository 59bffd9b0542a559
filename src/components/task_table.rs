//! Task Table Component
//!
//! Tasks of the selected list as an indented tree with inline status change.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::task::{self, TaskArgs};
use crate::commands::task_status::{self, TaskStatusArgs};
use crate::components::{DeleteConfirmButton, InlineCreate, TaskDetails};
use crate::context::AppContext;
use crate::format::{format_due, parse_local_datetime};
use crate::models::{Task, TaskStatus};
use crate::query::{CacheTag, Mutation};
use crate::store::{store_find_list, use_app_store, AppStateStoreFields};
use crate::tree::{child_counts, flatten_tasks};

#[component]
pub fn TaskTable() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let task_version = ctx.version(CacheTag::Task);
    let status_version = ctx.version(CacheTag::TaskStatus);

    let tasks = RwSignal::new(Vec::<Task>::new());
    let collapsed = RwSignal::new(HashSet::<u32>::new());
    let adding_under = RwSignal::new(None::<u32>);
    let selected_task = RwSignal::new(None::<u32>);

    Effect::new(move |_| {
        let _ = task_version.get();
        let Some(list_id) = store.selected_list().get() else {
            tasks.set(Vec::new());
            return;
        };
        spawn_local(async move {
            match task::list_tasks(list_id).await {
                Ok(loaded) => tasks.set(loaded),
                Err(e) => ctx.report("load tasks", &e),
            }
        });
    });

    Effect::new(move |_| {
        let _ = status_version.get();
        spawn_local(async move {
            match task_status::list_statuses().await {
                Ok(statuses) => store.task_statuses().set(statuses),
                Err(e) => ctx.report("load statuses", &e),
            }
        });
    });

    let rows = Memo::new(move |_| {
        let all = tasks.get();
        let counts = child_counts(&all);
        collapsed.with(|c| flatten_tasks(&all, c))
            .into_iter()
            .map(|(task, depth)| {
                let child_count = counts.get(&task.id).copied().unwrap_or(0);
                (task, depth, child_count)
            })
            .collect::<Vec<_>>()
    });

    let list_name = move || {
        store
            .selected_list()
            .get()
            .and_then(|id| store_find_list(&store, id))
            .map(|list| list.name)
            .unwrap_or_default()
    };

    view! {
        <section class="task-table">
            <Show
                when=move || store.selected_list().get().is_some()
                fallback=|| view! { <p class="empty-hint">"Soldan siyahı seçin"</p> }
            >
                <h2>{list_name}</h2>
                <NewTaskForm adding_under=adding_under />
                <table>
                    <thead>
                        <tr>
                            <th>"Tapşırıq"</th>
                            <th>"Status"</th>
                            <th>"Son tarix"</th>
                            <th>"İcraçılar"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=|(task, depth, child_count)| {
                                (task.id, task.title.clone(), task.status_id, task.due_at, *depth, *child_count)
                            }
                            children=move |(task, depth, child_count)| {
                                view! {
                                    <TaskRow
                                        task=task
                                        depth=depth
                                        child_count=child_count
                                        collapsed=collapsed
                                        adding_under=adding_under
                                        selected_task=selected_task
                                    />
                                }
                            }
                        />
                    </tbody>
                </table>
                <p class="item-count">{move || format!("{} tapşırıq", tasks.with(|t| t.len()))}</p>
                <StatusManager />
            </Show>
            <Show when=move || selected_task.get().is_some()>
                <TaskDetails
                    task=Signal::derive(move || {
                        let id = selected_task.get()?;
                        tasks.with(|all| all.iter().find(|t| t.id == id).cloned())
                    })
                    on_close=move |_: ()| selected_task.set(None)
                />
            </Show>
        </section>
    }
}

#[component]
fn TaskRow(
    task: Task,
    depth: usize,
    child_count: usize,
    collapsed: RwSignal<HashSet<u32>>,
    adding_under: RwSignal<Option<u32>>,
    selected_task: RwSignal<Option<u32>>,
) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let task_id = task.id;
    let status_id = task.status_id;
    let is_collapsed = move || collapsed.with(|c| c.contains(&task_id));

    let toggle = move |_| {
        collapsed.update(|c| {
            if !c.remove(&task_id) {
                c.insert(task_id);
            }
        });
    };
    let change_status = move |ev: web_sys::Event| {
        let Ok(new_status) = event_target_value(&ev).parse::<u32>() else { return };
        if Some(new_status) == status_id {
            return;
        }
        ctx.mutate("change status", Mutation::UpdateTask, task::set_status(task_id, new_status));
    };
    let delete = move |_: ()| {
        if selected_task.get_untracked() == Some(task_id) {
            selected_task.set(None);
        }
        ctx.mutate("delete task", Mutation::DeleteTask, task::delete_task(task_id));
    };
    let assignees = task.assignees.iter().map(|u| u.full_name()).collect::<Vec<_>>().join(", ");

    view! {
        <tr class=move || if selected_task.get() == Some(task_id) { "task-row selected" } else { "task-row" }>
            <td class="task-title-cell" style=format!("padding-left: {}px", 8 + depth * 20)>
                {(child_count > 0).then(|| view! {
                    <button class="collapse-btn" on:click=toggle>
                        {move || if is_collapsed() { "▸" } else { "▾" }}
                    </button>
                })}
                <span class="task-title" on:click=move |_| selected_task.set(Some(task_id))>{task.title.clone()}</span>
                {(child_count > 0).then(|| view! { <span class="child-count">{format!("({})", child_count)}</span> })}
            </td>
            <td>
                <select class="status-select" on:change=change_status>
                    <option value="" selected=status_id.is_none()>"—"</option>
                    {move || {
                        store
                            .task_statuses()
                            .get()
                            .into_iter()
                            .map(|status: TaskStatus| {
                                let selected = status_id == Some(status.id);
                                view! {
                                    <option value=status.id.to_string() selected=selected>{status.name}</option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            </td>
            <td class="due-cell">{format_due(task.due_at)}</td>
            <td class="assignee-cell">{assignees}</td>
            <td class="row-actions">
                <button class="add-child-btn" title="Alt tapşırıq" on:click=move |_| adding_under.set(Some(task_id))>
                    "+"
                </button>
                <DeleteConfirmButton button_class="row-delete-btn" on_confirm=delete />
            </td>
        </tr>
    }
}

/// Create form; adds a subtask while `adding_under` is set
#[component]
fn NewTaskForm(adding_under: RwSignal<Option<u32>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (title, set_title) = signal(String::new());
    let (due, set_due) = signal(String::new());

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(task_list_id) = store.selected_list().get_untracked() else { return };
        let args = TaskArgs {
            title: title.get_untracked().trim().to_string(),
            task_list_id,
            parent_id: adding_under.get_untracked(),
            due_at: parse_local_datetime(&due.get_untracked()),
            ..Default::default()
        };
        if let Err(e) = args.validate() {
            ctx.toast_error(e.user_message());
            return;
        }
        set_title.set(String::new());
        set_due.set(String::new());
        adding_under.set(None);
        ctx.mutate("create task", Mutation::CreateTask, async move { task::create_task(&args).await });
    };

    view! {
        <form class="new-task-form" on:submit=create>
            <input
                type="text"
                placeholder=move || match adding_under.get() {
                    Some(parent) => format!("#{} altında alt tapşırıq...", parent),
                    None => "Yeni tapşırıq...".to_string(),
                }
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <input type="datetime-local" prop:value=move || due.get() on:input=move |ev| set_due.set(event_target_value(&ev)) />
            <button type="submit">"Əlavə et"</button>
            <Show when=move || adding_under.get().is_some()>
                <button type="button" class="cancel-btn" on:click=move |_| adding_under.set(None)>"✗"</button>
            </Show>
        </form>
    }
}

#[component]
fn StatusManager() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let create = move |name: String| {
        let args = TaskStatusArgs { name, color: None };
        ctx.mutate("create status", Mutation::CreateTaskStatus, async move {
            task_status::create_status(&args).await
        });
    };

    view! {
        <div class="status-manager">
            <span class="status-manager-title">"Statuslar"</span>
            <For
                each=move || store.task_statuses().get()
                key=|status| (status.id, status.name.clone())
                children=move |status| {
                    let id = status.id;
                    let style = status.color.clone().map(|c| format!("background: {}", c)).unwrap_or_default();
                    view! {
                        <span class="status-chip" style=style>
                            {status.name}
                            <DeleteConfirmButton
                                button_class="status-delete-btn"
                                on_confirm=move |_: ()| {
                                    ctx.mutate("delete status", Mutation::DeleteTaskStatus, task_status::delete_status(id));
                                }
                            />
                        </span>
                    }
                }
            />
            <InlineCreate placeholder="Yeni status..." on_create=create />
        </div>
    }
}
