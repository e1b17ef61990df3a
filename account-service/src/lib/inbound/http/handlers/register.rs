use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::present;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let (Some(username), Some(email), Some(password)) = (
            present(self.username),
            present(self.email),
            present(self.password),
        ) else {
            return Err(ApiError::BadRequest(
                "All fields (username, email, password) are required".to_string(),
            ));
        };

        let username = Username::new(username).map_err(UserError::from)?;
        let email = EmailAddress::new(email).map_err(UserError::from)?;
        let password = Password::for_registration(password).map_err(UserError::from)?;

        Ok(RegisterCommand::new(username, email, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: Option<&str>, email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_or_blank_fields() {
        for req in [
            request(None, Some("alice@example.com"), Some("longpassword")),
            request(Some("alice"), Some("  "), Some("longpassword")),
            request(Some("alice"), Some("alice@example.com"), Some("")),
        ] {
            assert_eq!(
                req.try_into_command().unwrap_err(),
                ApiError::BadRequest("All fields (username, email, password) are required".to_string())
            );
        }
    }

    #[test]
    fn test_invalid_email_is_bad_request() {
        let err = request(Some("alice"), Some("not-an-email"), Some("longpassword"))
            .try_into_command()
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Invalid email format".to_string()));
    }

    #[test]
    fn test_short_password_is_unprocessable() {
        let err = request(Some("alice"), Some("alice@example.com"), Some("short"))
            .try_into_command()
            .unwrap_err();
        assert!(matches!(err, ApiError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_valid_request() {
        let command = request(Some("alice"), Some("alice@example.com"), Some("longpassword"))
            .try_into_command()
            .unwrap();
        assert_eq!(command.email.as_str(), "alice@example.com");
        assert_eq!(command.username.as_str(), "alice");
    }
}
