//! Auth Commands

use serde::Serialize;

use super::{get, post, require, ApiResult};
use crate::models::{AuthResponse, User};

#[derive(Debug, Clone, Serialize)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

impl LoginArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.email, "E-poçt tələb olunur")?;
        require(&self.password, "Şifrə tələb olunur")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterArgs {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

impl RegisterArgs {
    pub fn validate(&self) -> ApiResult<()> {
        require(&self.name, "Ad tələb olunur")?;
        require(&self.email, "E-poçt tələb olunur")?;
        require(&self.password, "Şifrə tələb olunur")
    }
}

pub async fn login(args: &LoginArgs) -> ApiResult<AuthResponse> {
    args.validate()?;
    post("/auth/login", args).await
}

pub async fn register(args: &RegisterArgs) -> ApiResult<AuthResponse> {
    args.validate()?;
    post("/auth/register", args).await
}

/// Resolve the stored token to a user
pub async fn verify() -> ApiResult<User> {
    get("/auth/verify").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ApiError;

    #[test]
    fn test_login_requires_both_fields() {
        let args = LoginArgs { email: "leyla@mail.az".to_string(), password: " ".to_string() };
        assert!(matches!(args.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_register_payload_is_camel_case() {
        let args = RegisterArgs {
            name: "Leyla".to_string(),
            surname: "Məmmədova".to_string(),
            email: "leyla@mail.az".to_string(),
            password: "secret".to_string(),
        };
        assert!(args.validate().is_ok());
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json["surname"], "Məmmədova");
    }
}
