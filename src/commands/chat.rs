//! Chat Commands
//!
//! History and room management go over REST; live traffic uses the socket.

use serde::Serialize;
use serde_json::json;

use super::{get, patch_unit, post, require, ApiError, ApiResult};
use crate::models::{ChatMessage, ChatRoom};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupArgs {
    pub name: String,
    pub member_ids: Vec<u32>,
}

impl CreateGroupArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Qrupun adı tələb olunur")?;
        if self.member_ids.is_empty() {
            return Err(ApiError::Validation("Ən azı bir üzv seçin".to_string()));
        }
        Ok(())
    }
}

pub async fn list_rooms() -> ApiResult<Vec<ChatRoom>> {
    get("/chat/rooms").await
}

pub async fn list_messages(room_id: u32) -> ApiResult<Vec<ChatMessage>> {
    get(&format!("/chat/rooms/{}/messages", room_id)).await
}

/// Existing direct room with the user, or a new one
pub async fn open_direct_room(user_id: u32) -> ApiResult<ChatRoom> {
    post("/chat/rooms/direct", &json!({ "userId": user_id })).await
}

pub async fn create_group_room(args: &CreateGroupArgs) -> ApiResult<ChatRoom> {
    args.validate()?;
    post("/chat/rooms/group", args).await
}

pub async fn mark_room_read(room_id: u32) -> ApiResult<()> {
    patch_unit(&format!("/chat/rooms/{}/read", room_id), &json!({})).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_needs_members() {
        let args = CreateGroupArgs { name: "Dizayn".to_string(), member_ids: vec![] };
        assert!(args.validate().is_err());
        let args = CreateGroupArgs { name: "Dizayn".to_string(), member_ids: vec![2, 3] };
        assert!(args.validate().is_ok());
    }
}
