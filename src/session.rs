//! Session Token
//!
//! The bearer token is the only state persisted in the browser.

use tracing::warn;

use crate::commands::{ApiError, ApiResult};

const TOKEN_KEY: &str = "token";

fn storage() -> ApiResult<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| ApiError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|e| ApiError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| ApiError::Storage("local storage disabled".to_string()))
}

pub fn load_token() -> Option<String> {
    let storage = storage().ok()?;
    storage.get_item(TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
}

pub fn save_token(token: &str) -> ApiResult<()> {
    storage()?
        .set_item(TOKEN_KEY, token)
        .map_err(|e| ApiError::Storage(format!("{:?}", e)))
}

pub fn clear_token() {
    match storage() {
        Ok(storage) => {
            if let Err(e) = storage.remove_item(TOKEN_KEY) {
                warn!(error = ?e, "token not removed");
            }
        }
        Err(e) => warn!(error = %e, "token not removed"),
    }
}
