//! Space Commands

use serde::Serialize;
use serde_json::json;

use super::{delete, get, patch, patch_unit, post, require, ApiResult};
use crate::models::Space;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceArgs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SpaceArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Sahənin adı tələb olunur")
    }
}

/// All spaces with folders and lists nested
pub async fn list_spaces() -> ApiResult<Vec<Space>> {
    get("/space").await
}

pub async fn create_space(args: &SpaceArgs) -> ApiResult<Space> {
    args.validate()?;
    post("/space", args).await
}

pub async fn update_space(id: u32, args: &SpaceArgs) -> ApiResult<Space> {
    args.validate()?;
    patch(&format!("/space/{}", id), args).await
}

/// Moves the space to the trash
pub async fn delete_space(id: u32) -> ApiResult<()> {
    delete(&format!("/space/{}", id)).await
}

pub async fn reorder_spaces(ids: &[u32]) -> ApiResult<()> {
    patch_unit("/space/reorder", &json!({ "ids": ids })).await
}

