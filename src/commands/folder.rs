//! Folder Commands

use serde::Serialize;
use serde_json::json;

use super::{delete, patch, patch_unit, post, require, ApiResult};
use crate::models::Folder;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderArgs {
    pub name: String,
    pub space_id: u32,
}

impl CreateFolderArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Qovluğun adı tələb olunur")
    }
}

pub async fn create_folder(args: &CreateFolderArgs) -> ApiResult<Folder> {
    args.validate()?;
    post("/folder", args).await
}

pub async fn rename_folder(id: u32, name: &str) -> ApiResult<Folder> {
    require(name, "Qovluğun adı tələb olunur")?;
    patch(&format!("/folder/{}", id), &json!({ "name": name })).await
}

pub async fn delete_folder(id: u32) -> ApiResult<()> {
    delete(&format!("/folder/{}", id)).await
}

pub async fn reorder_folders(space_id: u32, ids: &[u32]) -> ApiResult<()> {
    patch_unit("/folder/reorder", &json!({ "spaceId": space_id, "ids": ids })).await
}

pub async fn move_folder(id: u32, space_id: u32) -> ApiResult<()> {
    patch_unit(&format!("/folder/{}/move", id), &json!({ "spaceId": space_id })).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload() {
        let args = CreateFolderArgs { name: "Sprint 4".to_string(), space_id: 2 };
        assert!(args.validate().is_ok());
        assert_eq!(serde_json::to_value(&args).unwrap(), json!({ "name": "Sprint 4", "spaceId": 2 }));
    }
}
