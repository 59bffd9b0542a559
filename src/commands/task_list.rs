//! Task List Commands
//!
//! A list belongs to a space or to a folder, never both.

use serde::Serialize;
use serde_json::{json, Value};

use super::{delete, get, patch, patch_unit, post, require, ApiResult};
use crate::models::{ListParent, TaskList};

fn parent_fields(parent: ListParent) -> Value {
    match parent {
        ListParent::Space(id) => json!({ "spaceId": id, "folderId": null }),
        ListParent::Folder(id) => json!({ "spaceId": null, "folderId": id }),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskListArgs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<u32>,
}

impl CreateTaskListArgs {
    pub fn new(name: &str, parent: ListParent) -> Self {
        let (space_id, folder_id) = match parent {
            ListParent::Space(id) => (Some(id), None),
            ListParent::Folder(id) => (None, Some(id)),
        };
        Self { name: name.to_string(), space_id, folder_id }
    }

    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Siyahının adı tələb olunur")
    }
}

pub async fn list_archived() -> ApiResult<Vec<TaskList>> {
    get("/task-list/archived").await
}

pub async fn create_task_list(args: &CreateTaskListArgs) -> ApiResult<TaskList> {
    args.validate()?;
    post("/task-list", args).await
}

pub async fn rename_task_list(id: u32, name: &str) -> ApiResult<TaskList> {
    require(name, "Siyahının adı tələb olunur")?;
    patch(&format!("/task-list/{}", id), &json!({ "name": name })).await
}

pub async fn delete_task_list(id: u32) -> ApiResult<()> {
    delete(&format!("/task-list/{}", id)).await
}

pub async fn set_archived(id: u32, archived: bool) -> ApiResult<()> {
    patch_unit(&format!("/task-list/{}/archive", id), &json!({ "isArchived": archived })).await
}

pub async fn reorder_task_lists(parent: ListParent, ids: &[u32]) -> ApiResult<()> {
    let mut body = parent_fields(parent);
    body["ids"] = json!(ids);
    patch_unit("/task-list/reorder", &body).await
}

pub async fn move_task_list(id: u32, parent: ListParent) -> ApiResult<()> {
    patch_unit(&format!("/task-list/{}/move", id), &parent_fields(parent)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_under_folder_omits_space() {
        let args = CreateTaskListArgs::new("Backlog", ListParent::Folder(4));
        assert_eq!(serde_json::to_value(&args).unwrap(), json!({ "name": "Backlog", "folderId": 4 }));
    }

    #[test]
    fn test_move_body_clears_other_parent() {
        assert_eq!(parent_fields(ListParent::Space(2)), json!({ "spaceId": 2, "folderId": null }));
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(CreateTaskListArgs::new("", ListParent::Space(1)).validate().is_err());
    }
}
