//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use std::collections::HashSet;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Space, TaskList, TaskStatus, User};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user, set once `verify` succeeds
    pub current_user: Option<User>,
    /// Space tree (folders and lists nested) for the sidebar
    pub spaces: Vec<Space>,
    pub task_statuses: Vec<TaskStatus>,
    pub users: Vec<User>,
    /// User ids reported online by the chat socket
    pub online_users: HashSet<u32>,
    /// List shown in the task table
    pub selected_list: Option<u32>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_current_user_id(store: &AppStore) -> Option<u32> {
    store.current_user().with_untracked(|user| user.as_ref().map(|u| u.id))
}

pub fn store_set_online(store: &AppStore, user_id: u32, online: bool) {
    store.online_users().update(|set| {
        if online {
            set.insert(user_id);
        } else {
            set.remove(&user_id);
        }
    });
}

/// Find a list anywhere in the space tree
pub fn store_find_list(store: &AppStore, list_id: u32) -> Option<TaskList> {
    store.spaces().with(|spaces| {
        spaces.iter().find_map(|space| {
            space
                .task_lists
                .iter()
                .chain(space.folders.iter().flat_map(|f| f.task_lists.iter()))
                .find(|l| l.id == list_id)
                .cloned()
        })
    })
}

/// Drop everything tied to the signed-in user
pub fn store_reset(store: &AppStore) {
    store.set(AppState::default());
}
