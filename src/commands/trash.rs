//! Trash Commands

use serde_json::json;

use super::{delete, get, post_unit, ApiResult};
use crate::models::{TrashEntry, TrashKind};

pub async fn list_trash() -> ApiResult<Vec<TrashEntry>> {
    get("/trash").await
}

pub async fn restore(kind: TrashKind, id: u32) -> ApiResult<()> {
    post_unit(&format!("/trash/{}/{}/restore", kind.as_str(), id), &json!({})).await
}

/// Permanent delete
pub async fn purge(kind: TrashKind, id: u32) -> ApiResult<()> {
    delete(&format!("/trash/{}/{}", kind.as_str(), id)).await
}
