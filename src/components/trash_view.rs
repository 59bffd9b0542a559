//! Trash View Component
//!
//! Deleted spaces, folders, lists and tasks, plus archived lists.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{task_list, trash};
use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::format::format_timestamp;
use crate::models::{TaskList, TrashEntry, TrashKind};
use crate::query::{CacheTag, Mutation};

fn kind_label(kind: TrashKind) -> &'static str {
    match kind {
        TrashKind::Space => "Sahə",
        TrashKind::Folder => "Qovluq",
        TrashKind::TaskList => "Siyahı",
        TrashKind::Task => "Tapşırıq",
    }
}

#[component]
pub fn TrashView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let trash_version = ctx.version(CacheTag::Trash);
    let list_version = ctx.version(CacheTag::TaskList);

    let entries = RwSignal::new(Vec::<TrashEntry>::new());
    let archived = RwSignal::new(Vec::<TaskList>::new());

    Effect::new(move |_| {
        let _ = trash_version.get();
        spawn_local(async move {
            match trash::list_trash().await {
                Ok(loaded) => entries.set(loaded),
                Err(e) => ctx.report("load trash", &e),
            }
        });
    });

    Effect::new(move |_| {
        let _ = list_version.get();
        spawn_local(async move {
            match task_list::list_archived().await {
                Ok(loaded) => archived.set(loaded),
                Err(e) => ctx.report("load archived lists", &e),
            }
        });
    });

    view! {
        <section class="trash-view">
            <h2>"Zibil qutusu"</h2>
            <Show when=move || entries.with(|e| e.is_empty())>
                <p class="empty-hint">"Zibil qutusu boşdur"</p>
            </Show>
            <ul class="trash-list">
                <For
                    each=move || entries.get()
                    key=|entry| (entry.kind, entry.id)
                    children=move |entry| {
                        let kind = entry.kind;
                        let id = entry.id;
                        let deleted_by = entry.deleted_by.as_ref().map(|u| u.full_name()).unwrap_or_default();
                        view! {
                            <li class="trash-entry">
                                <span class="trash-kind">{kind_label(kind)}</span>
                                <span class="trash-name">{entry.name}</span>
                                <span class="trash-meta">{format_timestamp(entry.deleted_at)} " " {deleted_by}</span>
                                <button
                                    class="restore-btn"
                                    on:click=move |_| ctx.mutate("restore", Mutation::RestoreTrash, trash::restore(kind, id))
                                >
                                    "Bərpa et"
                                </button>
                                <DeleteConfirmButton
                                    button_class="row-delete-btn"
                                    prompt="Həmişəlik silinsin?"
                                    on_confirm=move |_: ()| ctx.mutate("purge", Mutation::PurgeTrash, trash::purge(kind, id))
                                />
                            </li>
                        }
                    }
                />
            </ul>
            <h3>"Arxivlənmiş siyahılar"</h3>
            <ul class="archived-list">
                <For
                    each=move || archived.get()
                    key=|list| list.id
                    children=move |list| {
                        let id = list.id;
                        view! {
                            <li class="archived-entry">
                                <span>{list.name}</span>
                                <button
                                    class="restore-btn"
                                    on:click=move |_| {
                                        ctx.mutate("unarchive list", Mutation::ArchiveTaskList, task_list::set_archived(id, false))
                                    }
                                >
                                    "Arxivdən çıxar"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
