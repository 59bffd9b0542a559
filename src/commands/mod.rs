//! REST Command Wrappers
//!
//! Frontend bindings to backend endpoints, organized by domain.

pub mod activity_log;
pub mod auth;
pub mod chat;
pub mod folder;
pub mod notification;
pub mod space;
pub mod task;
pub mod task_list;
pub mod task_status;
pub mod trash;
pub mod user;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::config;
use crate::session;

/// Shown when the server gives no usable message
pub const GENERIC_ERROR: &str = "Xəta baş verdi!";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned {status}: {message:?}")]
    Server { status: u16, message: Option<String> },

    #[error("not authenticated")]
    Unauthorized,

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage unavailable: {0}")]
    Storage(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
}

/// Server error bodies carry `message` as a string or a list of strings
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.message? {
        Value::String(message) if !message.trim().is_empty() => Some(message),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        ApiError::Server { status: status.as_u16(), message: extract_message(body) }
    }

    /// Text for the toast
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message: Some(message), .. } => message.clone(),
            ApiError::Validation(message) => message.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

fn request(method: Method, path: &str) -> RequestBuilder {
    let builder = Client::new().request(method, config().api_url(path));
    match session::load_token() {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "request rejected");
    Err(ApiError::from_status(status, &body))
}

async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = check(response).await?;
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) async fn get<T: DeserializeOwned>(path: &str) -> ApiResult<T> {
    parse(request(Method::GET, path).send().await?).await
}

pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(path: &str, body: &B) -> ApiResult<T> {
    parse(request(Method::POST, path).json(body).send().await?).await
}

pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(path: &str, body: &B) -> ApiResult<T> {
    parse(request(Method::PATCH, path).json(body).send().await?).await
}

/// Write whose response body is ignored
pub(crate) async fn patch_unit<B: Serialize>(path: &str, body: &B) -> ApiResult<()> {
    check(request(Method::PATCH, path).json(body).send().await?).await?;
    Ok(())
}

pub(crate) async fn post_unit<B: Serialize>(path: &str, body: &B) -> ApiResult<()> {
    check(request(Method::POST, path).json(body).send().await?).await?;
    Ok(())
}

pub(crate) async fn delete(path: &str) -> ApiResult<()> {
    check(request(Method::DELETE, path).send().await?).await?;
    Ok(())
}

/// Reject blank required fields before a round trip
pub(crate) fn require(value: &str, message: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"Ad artıq mövcuddur"}"#);
        assert_eq!(err.user_message(), "Ad artıq mövcuddur");
    }

    #[test]
    fn test_user_message_joins_validation_list() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":["title is required","dueAt invalid"]}"#);
        assert_eq!(err.user_message(), "title is required, dueAt invalid");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message(), GENERIC_ERROR);
        assert_eq!(ApiError::Network("offline".to_string()).user_message(), GENERIC_ERROR);
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":""}"#).user_message(), GENERIC_ERROR);
    }

    #[test]
    fn test_unauthorized_status() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized));
    }

    #[test]
    fn test_require() {
        assert!(require("  ", "Ad tələb olunur").is_err());
        assert!(require("Sprint", "Ad tələb olunur").is_ok());
    }
}
