//! User Commands

use super::{get, ApiResult};
use crate::models::User;

pub async fn list_users() -> ApiResult<Vec<User>> {
    get("/user").await
}
