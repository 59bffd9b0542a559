//! Task Status Commands

use serde::Serialize;

use super::{delete, get, post, require, ApiResult};
use crate::models::TaskStatus;

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatusArgs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TaskStatusArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Statusun adı tələb olunur")
    }
}

pub async fn list_statuses() -> ApiResult<Vec<TaskStatus>> {
    get("/task-status").await
}

pub async fn create_status(args: &TaskStatusArgs) -> ApiResult<TaskStatus> {
    args.validate()?;
    post("/task-status", args).await
}

pub async fn delete_status(id: u32) -> ApiResult<()> {
    delete(&format!("/task-status/{}", id)).await
}
