//! Sidebar Drop Resolution
//!
//! Turns a drag source, a drop target and the pointer half into a single
//! server request. The sidebar never reorders locally; it re-renders once the
//! request succeeds and the space tree is invalidated.

use std::collections::HashMap;

use leptos_dragdrop::{reorder, DropPosition};

use crate::models::{ListParent, Space, TaskList};
use crate::query::Mutation;

/// Draggable sidebar row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidebarNode {
    Space(u32),
    Folder { id: u32, space_id: u32 },
    List { id: u32, parent: ListParent },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropCommand {
    ReorderSpaces(Vec<u32>),
    ReorderFolders { space_id: u32, ids: Vec<u32> },
    MoveFolder { folder_id: u32, space_id: u32 },
    ReorderLists { parent: ListParent, ids: Vec<u32> },
    MoveList { list_id: u32, parent: ListParent },
}

impl DropCommand {
    pub fn mutation(&self) -> Mutation {
        match self {
            DropCommand::ReorderSpaces(_) => Mutation::ReorderSpaces,
            DropCommand::ReorderFolders { .. } => Mutation::ReorderFolders,
            DropCommand::MoveFolder { .. } => Mutation::MoveFolder,
            DropCommand::ReorderLists { .. } => Mutation::ReorderTaskLists,
            DropCommand::MoveList { .. } => Mutation::MoveTaskList,
        }
    }
}

/// Ordered ids per container, as currently rendered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarTree {
    spaces: Vec<u32>,
    folders: HashMap<u32, Vec<u32>>,
    lists: HashMap<ListParent, Vec<u32>>,
}

fn ordered_list_ids<'a>(lists: impl Iterator<Item = &'a TaskList>) -> Vec<u32> {
    let mut visible: Vec<&TaskList> = lists.filter(|l| !l.is_archived).collect();
    visible.sort_by_key(|l| l.position);
    visible.iter().map(|l| l.id).collect()
}

impl SidebarTree {
    pub fn from_spaces(spaces: &[Space]) -> Self {
        let mut tree = SidebarTree::default();
        for space in spaces {
            tree.spaces.push(space.id);

            let mut folders: Vec<_> = space.folders.iter().collect();
            folders.sort_by_key(|f| f.position);
            tree.folders.insert(space.id, folders.iter().map(|f| f.id).collect());

            for folder in &space.folders {
                tree.lists.insert(ListParent::Folder(folder.id), ordered_list_ids(folder.task_lists.iter()));
            }
            let direct = space
                .task_lists
                .iter()
                .filter(|l| matches!(l.parent(), None | Some(ListParent::Space(_))));
            tree.lists.insert(ListParent::Space(space.id), ordered_list_ids(direct));
        }
        tree
    }

    pub fn spaces(&self) -> &[u32] {
        &self.spaces
    }

    pub fn folders(&self, space_id: u32) -> &[u32] {
        self.folders.get(&space_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lists(&self, parent: ListParent) -> &[u32] {
        self.lists.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Reorder within a container, skipping drops that leave the order unchanged
fn reorder_changed(ids: &[u32], source: u32, target: u32, position: DropPosition) -> Option<Vec<u32>> {
    reorder(ids, &source, &target, position).filter(|order| order.as_slice() != ids)
}

/// Map a drop onto a request; `None` for unsupported pairs and no-ops
pub fn resolve_drop(
    tree: &SidebarTree,
    source: SidebarNode,
    target: SidebarNode,
    position: DropPosition,
) -> Option<DropCommand> {
    use SidebarNode as N;

    match (source, target) {
        (N::Space(source_id), N::Space(target_id)) => {
            reorder_changed(tree.spaces(), source_id, target_id, position).map(DropCommand::ReorderSpaces)
        }
        (N::Folder { id, space_id }, N::Folder { id: target_id, space_id: target_space }) => {
            if space_id == target_space {
                reorder_changed(tree.folders(space_id), id, target_id, position)
                    .map(|ids| DropCommand::ReorderFolders { space_id, ids })
            } else {
                Some(DropCommand::MoveFolder { folder_id: id, space_id: target_space })
            }
        }
        (N::Folder { id, space_id }, N::Space(target_space)) => {
            (space_id != target_space).then_some(DropCommand::MoveFolder { folder_id: id, space_id: target_space })
        }
        (N::List { id, parent }, N::List { id: target_id, parent: target_parent }) => {
            if parent == target_parent {
                reorder_changed(tree.lists(parent), id, target_id, position)
                    .map(|ids| DropCommand::ReorderLists { parent, ids })
            } else {
                Some(DropCommand::MoveList { list_id: id, parent: target_parent })
            }
        }
        (N::List { id, parent }, N::Folder { id: folder_id, .. }) => {
            let new_parent = ListParent::Folder(folder_id);
            (parent != new_parent).then_some(DropCommand::MoveList { list_id: id, parent: new_parent })
        }
        (N::List { id, parent }, N::Space(space_id)) => {
            let new_parent = ListParent::Space(space_id);
            (parent != new_parent).then_some(DropCommand::MoveList { list_id: id, parent: new_parent })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Folder, TaskList};

    fn list(id: u32, space_id: Option<u32>, folder_id: Option<u32>, position: i32) -> TaskList {
        TaskList { id, name: format!("List {}", id), space_id, folder_id, is_archived: false, position }
    }

    fn folder(id: u32, space_id: u32, position: i32, lists: Vec<TaskList>) -> Folder {
        Folder { id, name: format!("Folder {}", id), space_id, task_lists: lists, assignees: vec![], position }
    }

    fn space(id: u32, folders: Vec<Folder>, lists: Vec<TaskList>) -> Space {
        Space { id, name: format!("Space {}", id), description: None, folders, task_lists: lists, assignees: vec![] }
    }

    fn sample_tree() -> SidebarTree {
        SidebarTree::from_spaces(&[
            space(
                1,
                vec![
                    folder(10, 1, 1, vec![list(100, None, Some(10), 0), list(101, None, Some(10), 1)]),
                    folder(11, 1, 0, vec![]),
                ],
                vec![list(200, Some(1), None, 0), list(201, Some(1), None, 1), list(202, Some(1), None, 2)],
            ),
            space(2, vec![folder(20, 2, 0, vec![])], vec![]),
            space(3, vec![], vec![]),
        ])
    }

    #[test]
    fn test_tree_orders_by_position() {
        let tree = sample_tree();
        assert_eq!(tree.spaces(), &[1, 2, 3]);
        assert_eq!(tree.folders(1), &[11, 10]);
        assert_eq!(tree.lists(ListParent::Folder(10)), &[100, 101]);
        assert_eq!(tree.lists(ListParent::Space(1)), &[200, 201, 202]);
        assert!(tree.lists(ListParent::Space(3)).is_empty());
    }

    #[test]
    fn test_archived_lists_are_hidden() {
        let mut archived = list(300, Some(3), None, 0);
        archived.is_archived = true;
        let tree = SidebarTree::from_spaces(&[space(3, vec![], vec![archived, list(301, Some(3), None, 1)])]);
        assert_eq!(tree.lists(ListParent::Space(3)), &[301]);
    }

    #[test]
    fn test_space_reorder_first_to_last() {
        let tree = sample_tree();
        let cmd = resolve_drop(&tree, SidebarNode::Space(1), SidebarNode::Space(3), DropPosition::Below);
        assert_eq!(cmd, Some(DropCommand::ReorderSpaces(vec![2, 3, 1])));
    }

    #[test]
    fn test_space_reorder_above() {
        let tree = sample_tree();
        let cmd = resolve_drop(&tree, SidebarNode::Space(3), SidebarNode::Space(2), DropPosition::Above);
        assert_eq!(cmd, Some(DropCommand::ReorderSpaces(vec![1, 3, 2])));
    }

    #[test]
    fn test_unchanged_order_is_skipped() {
        let tree = sample_tree();
        // 1 is already directly above 2
        assert_eq!(resolve_drop(&tree, SidebarNode::Space(1), SidebarNode::Space(2), DropPosition::Above), None);
        assert_eq!(resolve_drop(&tree, SidebarNode::Space(2), SidebarNode::Space(2), DropPosition::Below), None);
    }

    #[test]
    fn test_folder_reorder_and_move() {
        let tree = sample_tree();
        let source = SidebarNode::Folder { id: 11, space_id: 1 };

        let reorder = resolve_drop(&tree, source, SidebarNode::Folder { id: 10, space_id: 1 }, DropPosition::Below);
        assert_eq!(reorder, Some(DropCommand::ReorderFolders { space_id: 1, ids: vec![10, 11] }));

        let across = resolve_drop(&tree, source, SidebarNode::Folder { id: 20, space_id: 2 }, DropPosition::Above);
        assert_eq!(across, Some(DropCommand::MoveFolder { folder_id: 11, space_id: 2 }));

        let onto_space = resolve_drop(&tree, source, SidebarNode::Space(3), DropPosition::Above);
        assert_eq!(onto_space, Some(DropCommand::MoveFolder { folder_id: 11, space_id: 3 }));

        assert_eq!(resolve_drop(&tree, source, SidebarNode::Space(1), DropPosition::Above), None);
    }

    #[test]
    fn test_list_reorder_within_parent() {
        let tree = sample_tree();
        let source = SidebarNode::List { id: 202, parent: ListParent::Space(1) };
        let target = SidebarNode::List { id: 200, parent: ListParent::Space(1) };
        let cmd = resolve_drop(&tree, source, target, DropPosition::Below);
        assert_eq!(cmd, Some(DropCommand::ReorderLists { parent: ListParent::Space(1), ids: vec![200, 202, 201] }));
        assert_eq!(cmd.map(|c| c.mutation()), Some(Mutation::ReorderTaskLists));
    }

    #[test]
    fn test_list_moves_across_containers() {
        let tree = sample_tree();
        let source = SidebarNode::List { id: 200, parent: ListParent::Space(1) };

        let into_folder = resolve_drop(&tree, source, SidebarNode::Folder { id: 10, space_id: 1 }, DropPosition::Below);
        assert_eq!(into_folder, Some(DropCommand::MoveList { list_id: 200, parent: ListParent::Folder(10) }));

        let beside_folder_list = resolve_drop(
            &tree,
            source,
            SidebarNode::List { id: 100, parent: ListParent::Folder(10) },
            DropPosition::Above,
        );
        assert_eq!(beside_folder_list, Some(DropCommand::MoveList { list_id: 200, parent: ListParent::Folder(10) }));

        let into_space = resolve_drop(&tree, source, SidebarNode::Space(2), DropPosition::Above);
        assert_eq!(into_space, Some(DropCommand::MoveList { list_id: 200, parent: ListParent::Space(2) }));

        assert_eq!(resolve_drop(&tree, source, SidebarNode::Space(1), DropPosition::Above), None);
    }

    #[test]
    fn test_incompatible_pairs_are_ignored() {
        let tree = sample_tree();
        let space = SidebarNode::Space(1);
        let folder = SidebarNode::Folder { id: 10, space_id: 1 };
        let list = SidebarNode::List { id: 100, parent: ListParent::Folder(10) };
        assert_eq!(resolve_drop(&tree, space, folder, DropPosition::Above), None);
        assert_eq!(resolve_drop(&tree, space, list, DropPosition::Above), None);
        assert_eq!(resolve_drop(&tree, folder, list, DropPosition::Above), None);
    }
}
