//! Activity Log Commands

use super::{get, ApiResult};
use crate::models::ActivityLog;

pub async fn list_for_task(task_id: u32) -> ApiResult<Vec<ActivityLog>> {
    get(&format!("/activity-log?taskId={}", task_id)).await
}

pub async fn list_recent() -> ApiResult<Vec<ActivityLog>> {
    get("/activity-log/recent").await
}
