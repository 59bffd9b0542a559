//! Task Commands

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::{delete, get, patch, post, require, ApiError, ApiResult};
use crate::models::Task;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArgs {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub task_list_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignee_ids: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl From<&Task> for TaskArgs {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            task_list_id: task.task_list_id,
            parent_id: task.parent_id,
            status_id: task.status_id,
            assignee_ids: task.assignees.iter().map(|u| u.id).collect(),
            start_at: task.start_at,
            due_at: task.due_at,
            link: task.link.clone(),
        }
    }
}

impl TaskArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.title, "Tapşırığın adı tələb olunur")?;
        if let (Some(start), Some(due)) = (self.start_at, self.due_at) {
            if due < start {
                return Err(ApiError::Validation("Bitmə tarixi başlama tarixindən əvvəl ola bilməz".to_string()));
            }
        }
        Ok(())
    }
}

pub async fn list_tasks(task_list_id: u32) -> ApiResult<Vec<Task>> {
    get(&format!("/task?taskListId={}", task_list_id)).await
}

/// Tasks assigned to the signed-in user
pub async fn list_assigned_to_me() -> ApiResult<Vec<Task>> {
    get("/task/assigned").await
}

pub async fn create_task(args: &TaskArgs) -> ApiResult<Task> {
    args.validate()?;
    post("/task", args).await
}

pub async fn update_task(id: u32, args: &TaskArgs) -> ApiResult<Task> {
    args.validate()?;
    patch(&format!("/task/{}", id), args).await
}

pub async fn set_status(id: u32, status_id: u32) -> ApiResult<Task> {
    patch(&format!("/task/{}", id), &json!({ "statusId": status_id })).await
}

pub async fn delete_task(id: u32) -> ApiResult<()> {
    delete(&format!("/task/{}", id)).await
}

/// Server-side flag so other sessions skip the deadline reminder
pub async fn mark_reminder_sent(id: u32) -> ApiResult<Task> {
    patch(&format!("/task/{}", id), &json!({ "messageSent": true })).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_before_start_rejected() {
        let args = TaskArgs {
            title: "Release".to_string(),
            task_list_id: 1,
            start_at: Some(Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap()),
            due_at: Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(matches!(args.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_payload_skips_empty_fields() {
        let args = TaskArgs { title: "Release".to_string(), task_list_id: 3, parent_id: Some(9), ..Default::default() };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({ "title": "Release", "taskListId": 3, "parentId": 9 })
        );
    }
}
