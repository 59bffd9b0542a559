//! Notification Commands
//!
//! Notifications are user-scoped and live under the user resource.

use serde_json::json;

use super::{get, patch_unit, ApiResult};
use crate::models::Notification;

pub async fn list_notifications() -> ApiResult<Vec<Notification>> {
    get("/user/notifications").await
}

pub async fn mark_notification_read(id: u32) -> ApiResult<()> {
    patch_unit(&format!("/user/notifications/{}", id), &json!({ "isRead": true })).await
}

pub async fn mark_all_notifications_read() -> ApiResult<()> {
    patch_unit("/user/notifications/read-all", &json!({})).await
}
