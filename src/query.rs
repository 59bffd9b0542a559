//! Query Cache Tags
//!
//! Every fetch reads the version of one or more tags; every write bumps the
//! tags it invalidates, which re-runs the fetches that depend on them.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Space,
    Folder,
    TaskList,
    Task,
    TaskStatus,
    User,
    ActivityLog,
    Trash,
    ChatRoom,
    ChatMessages(u32),
    Notification,
}

/// Write endpoints, named by what they change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateSpace,
    UpdateSpace,
    DeleteSpace,
    ReorderSpaces,
    CreateFolder,
    UpdateFolder,
    DeleteFolder,
    ReorderFolders,
    MoveFolder,
    CreateTaskList,
    UpdateTaskList,
    DeleteTaskList,
    ReorderTaskLists,
    MoveTaskList,
    ArchiveTaskList,
    CreateTask,
    UpdateTask,
    DeleteTask,
    MarkReminderSent,
    CreateTaskStatus,
    DeleteTaskStatus,
    RestoreTrash,
    PurgeTrash,
    OpenDirectRoom,
    CreateGroupRoom,
    MarkRoomRead(u32),
    MarkNotificationRead,
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<CacheTag> {
        use CacheTag as T;
        match self {
            Mutation::CreateSpace
            | Mutation::UpdateSpace
            | Mutation::ReorderSpaces => vec![T::Space],
            Mutation::DeleteSpace => vec![T::Space, T::Trash],
            // the sidebar renders folders and lists from the space tree
            Mutation::CreateFolder
            | Mutation::UpdateFolder
            | Mutation::ReorderFolders
            | Mutation::MoveFolder => vec![T::Space, T::Folder],
            Mutation::DeleteFolder => vec![T::Space, T::Folder, T::Trash],
            Mutation::CreateTaskList
            | Mutation::UpdateTaskList
            | Mutation::ReorderTaskLists
            | Mutation::MoveTaskList => vec![T::Space, T::Folder, T::TaskList],
            Mutation::ArchiveTaskList | Mutation::DeleteTaskList => {
                vec![T::Space, T::Folder, T::TaskList, T::Trash]
            }
            Mutation::CreateTask | Mutation::UpdateTask => vec![T::Task, T::ActivityLog],
            Mutation::DeleteTask => vec![T::Task, T::ActivityLog, T::Trash],
            Mutation::MarkReminderSent => vec![T::Task],
            Mutation::CreateTaskStatus | Mutation::DeleteTaskStatus => {
                vec![T::TaskStatus, T::Task]
            }
            Mutation::RestoreTrash => vec![T::Trash, T::Space, T::Folder, T::TaskList, T::Task],
            Mutation::PurgeTrash => vec![T::Trash],
            Mutation::OpenDirectRoom | Mutation::CreateGroupRoom => vec![T::ChatRoom],
            Mutation::MarkRoomRead(room_id) => vec![T::ChatRoom, T::ChatMessages(*room_id)],
            Mutation::MarkNotificationRead => vec![T::Notification],
        }
    }
}

/// Version counter per tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidationLedger {
    versions: HashMap<CacheTag, u64>,
}

impl InvalidationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self, tag: CacheTag) -> u64 {
        self.versions.get(&tag).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, tag: CacheTag) {
        *self.versions.entry(tag).or_insert(0) += 1;
    }

    pub fn invalidate(&mut self, tags: &[CacheTag]) {
        for tag in tags {
            self.bump(*tag);
        }
    }

    /// Record a successful write; returns the tags that went stale
    pub fn apply(&mut self, mutation: Mutation) -> Vec<CacheTag> {
        let tags = mutation.invalidates();
        self.invalidate(&tags);
        tags
    }
}
