//! Sidebar Component
//!
//! Space tree with drag-and-drop. Rows never move locally: a drop becomes
//! one request, and the tree re-renders when the `Space` tag is bumped.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals, make_on_mouseleave, make_on_mousedown,
    make_on_row_mousemove, DndSignals, DropPosition};
use tracing::debug;

use crate::commands::folder::{self, CreateFolderArgs};
use crate::commands::space::{self, SpaceArgs};
use crate::commands::task_list::{self, CreateTaskListArgs};
use crate::commands::ApiResult;
use crate::components::{DeleteConfirmButton, EditableName, InlineCreate};
use crate::context::AppContext;
use crate::models::{Folder, ListParent, Space, TaskList};
use crate::query::{CacheTag, Mutation};
use crate::sidebar_order::{resolve_drop, DropCommand, SidebarNode, SidebarTree};
use crate::store::{use_app_store, AppStateStoreFields};

type Dnd = DndSignals<SidebarNode>;

async fn execute_drop(command: &DropCommand) -> ApiResult<()> {
    match command {
        DropCommand::ReorderSpaces(ids) => space::reorder_spaces(ids).await,
        DropCommand::ReorderFolders { space_id, ids } => folder::reorder_folders(*space_id, ids).await,
        DropCommand::MoveFolder { folder_id, space_id } => folder::move_folder(*folder_id, *space_id).await,
        DropCommand::ReorderLists { parent, ids } => task_list::reorder_task_lists(*parent, ids).await,
        DropCommand::MoveList { list_id, parent } => task_list::move_task_list(*list_id, *parent).await,
    }
}

fn sorted_folders(space: &Space) -> Vec<Folder> {
    let mut folders = space.folders.clone();
    folders.sort_by_key(|f| f.position);
    folders
}

fn visible_lists(lists: &[TaskList]) -> Vec<TaskList> {
    let mut visible: Vec<TaskList> = lists.iter().filter(|l| !l.is_archived).cloned().collect();
    visible.sort_by_key(|l| l.position);
    visible
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let spaces_version = ctx.version(CacheTag::Space);

    Effect::new(move |_| {
        let _ = spaces_version.get();
        spawn_local(async move {
            match space::list_spaces().await {
                Ok(spaces) => store.spaces().set(spaces),
                Err(e) => ctx.report("load spaces", &e),
            }
        });
    });

    let dnd = create_dnd_signals::<SidebarNode>();
    bind_global_mouseup(dnd, move |source, target| {
        let tree = store.spaces().with_untracked(|spaces| SidebarTree::from_spaces(spaces));
        let Some(command) = resolve_drop(&tree, source, target.key, target.position) else {
            debug!(?source, ?target, "drop ignored");
            return;
        };
        debug!(?command, "sidebar drop");
        let mutation = command.mutation();
        ctx.mutate("reorder sidebar", mutation, async move { execute_drop(&command).await });
    });

    let create_space = move |name: String| {
        let args = SpaceArgs { name, description: None };
        ctx.mutate("create space", Mutation::CreateSpace, async move { space::create_space(&args).await });
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <h3>"Sahələr"</h3>
                <InlineCreate placeholder="Yeni sahə..." on_create=create_space />
            </div>
            <div class=move || if dnd.dragging_read.get().is_some() { "space-tree dragging" } else { "space-tree" }>
                {move || {
                    store
                        .spaces()
                        .get()
                        .into_iter()
                        .map(|space| view! { <SpaceNode space=space dnd=dnd /> })
                        .collect_view()
                }}
            </div>
        </aside>
    }
}

/// Draggable header row; sets the drop-above / drop-below classes
#[component]
fn DraggableRow(node: SidebarNode, dnd: Dnd, #[prop(into)] class: String, children: Children) -> impl IntoView {
    let row_class = move || {
        let mut classes = class.clone();
        if dnd.is_dragging(node) {
            classes.push_str(" is-dragging");
        }
        match dnd.indicator(node) {
            Some(DropPosition::Above) => classes.push_str(" drop-above"),
            Some(DropPosition::Below) => classes.push_str(" drop-below"),
            None => {}
        }
        classes
    };

    view! {
        <div
            class=row_class
            on:mousedown=make_on_mousedown(dnd, node)
            on:mousemove=make_on_row_mousemove(dnd, node)
            on:mouseleave=make_on_mouseleave(dnd)
        >
            {children()}
        </div>
    }
}

#[component]
fn SpaceNode(space: Space, dnd: Dnd) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let space_id = space.id;
    let node = SidebarNode::Space(space_id);
    let description = space.description.clone();

    let rename = move |name: String| {
        let args = SpaceArgs { name, description: description.clone() };
        ctx.mutate("rename space", Mutation::UpdateSpace, async move { space::update_space(space_id, &args).await });
    };
    let delete = move |_: ()| {
        ctx.mutate("delete space", Mutation::DeleteSpace, space::delete_space(space_id));
    };
    let create_folder = move |name: String| {
        let args = CreateFolderArgs { name, space_id };
        ctx.mutate("create folder", Mutation::CreateFolder, async move { folder::create_folder(&args).await });
    };
    let create_list = move |name: String| {
        let args = CreateTaskListArgs::new(&name, ListParent::Space(space_id));
        ctx.mutate("create list", Mutation::CreateTaskList, async move { task_list::create_task_list(&args).await });
    };

    let folders = sorted_folders(&space);
    let lists = visible_lists(&space.task_lists);

    view! {
        <div class="space-node">
            <DraggableRow node=node dnd=dnd class="sidebar-row space-row">
                <span class="row-icon">"🗂"</span>
                <EditableName value=space.name.clone() on_save=rename />
                <span class="row-actions">
                    <InlineCreate placeholder="Yeni qovluq..." label="📁+" on_create=create_folder />
                    <InlineCreate placeholder="Yeni siyahı..." label="≡+" on_create=create_list />
                    <DeleteConfirmButton button_class="row-delete-btn" on_confirm=delete />
                </span>
            </DraggableRow>
            <div class="space-children">
                {folders.into_iter().map(|folder| view! { <FolderNode folder=folder dnd=dnd /> }).collect_view()}
                {lists.into_iter().map(|list| view! { <ListRow list=list dnd=dnd /> }).collect_view()}
            </div>
        </div>
    }
}

#[component]
fn FolderNode(folder: Folder, dnd: Dnd) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let folder_id = folder.id;
    let node = SidebarNode::Folder { id: folder_id, space_id: folder.space_id };
    let (expanded, set_expanded) = signal(true);

    let rename = move |name: String| {
        ctx.mutate("rename folder", Mutation::UpdateFolder, async move {
            folder::rename_folder(folder_id, &name).await
        });
    };
    let delete = move |_: ()| {
        ctx.mutate("delete folder", Mutation::DeleteFolder, folder::delete_folder(folder_id));
    };
    let create_list = move |name: String| {
        let args = CreateTaskListArgs::new(&name, ListParent::Folder(folder_id));
        ctx.mutate("create list", Mutation::CreateTaskList, async move { task_list::create_task_list(&args).await });
    };

    let lists = StoredValue::new(visible_lists(&folder.task_lists));

    view! {
        <div class="folder-node">
            <DraggableRow node=node dnd=dnd class="sidebar-row folder-row">
                <button class="collapse-btn" on:click=move |_| set_expanded.update(|e| *e = !*e)>
                    {move || if expanded.get() { "▾" } else { "▸" }}
                </button>
                <span class="row-icon">"📁"</span>
                <EditableName value=folder.name.clone() on_save=rename />
                <span class="row-actions">
                    <InlineCreate placeholder="Yeni siyahı..." label="≡+" on_create=create_list />
                    <DeleteConfirmButton button_class="row-delete-btn" on_confirm=delete />
                </span>
            </DraggableRow>
            <Show when=move || expanded.get()>
                <div class="folder-children">
                    {lists.get_value().into_iter().map(|list| view! { <ListRow list=list dnd=dnd /> }).collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ListRow(list: TaskList, dnd: Dnd) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let list_id = list.id;
    // Malformed payloads without a parent land under space 0
    let parent = list.parent().unwrap_or(ListParent::Space(list.space_id.unwrap_or_default()));
    let node = SidebarNode::List { id: list_id, parent };
    let is_selected = move || store.selected_list().get() == Some(list_id);

    let select = move |_| {
        if dnd.drag_just_ended_read.get_untracked() {
            return;
        }
        store.selected_list().set(Some(list_id));
    };
    let rename = move |name: String| {
        ctx.mutate("rename list", Mutation::UpdateTaskList, async move {
            task_list::rename_task_list(list_id, &name).await
        });
    };
    let archive = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if store.selected_list().get_untracked() == Some(list_id) {
            store.selected_list().set(None);
        }
        ctx.mutate("archive list", Mutation::ArchiveTaskList, task_list::set_archived(list_id, true));
    };
    let delete = move |_: ()| {
        if store.selected_list().get_untracked() == Some(list_id) {
            store.selected_list().set(None);
        }
        ctx.mutate("delete list", Mutation::DeleteTaskList, task_list::delete_task_list(list_id));
    };

    view! {
        <div on:click=select class=move || if is_selected() { "list-row-wrap active" } else { "list-row-wrap" }>
            <DraggableRow node=node dnd=dnd class="sidebar-row list-row">
                <span class="row-icon">"≡"</span>
                <EditableName value=list.name.clone() on_save=rename />
                <span class="row-actions">
                    <button class="archive-btn" title="Arxivlə" on:click=archive>"🗄"</button>
                    <DeleteConfirmButton button_class="row-delete-btn" on_confirm=delete />
                </span>
            </DraggableRow>
        </div>
    }
}
