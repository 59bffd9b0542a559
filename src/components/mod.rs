//! UI Components
//!
//! Views over the store, the invalidation ledger and the realtime sessions.

mod activity_log;
mod chat_panel;
mod delete_confirm_button;
mod inline_edit;
mod login;
mod notification_bell;
mod protected;
mod sidebar;
mod task_details;
mod task_table;
mod toast_host;
mod trash_view;

pub use activity_log::{ActivityEntry, ActivityFeed};
pub use chat_panel::ChatPanel;
pub use delete_confirm_button::DeleteConfirmButton;
pub use inline_edit::{EditableName, InlineCreate};
pub use login::LoginForm;
pub use notification_bell::NotificationBell;
pub use protected::{use_auth, Protected};
pub use sidebar::Sidebar;
pub use task_details::TaskDetails;
pub use task_table::TaskTable;
pub use toast_host::ToastHost;
pub use trash_view::TrashView;
