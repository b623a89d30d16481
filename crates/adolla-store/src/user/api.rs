//! User REST API
//!
//! Customer self-service: signup, password change, profile. These are
//! not administrative mutations, so they write through the repository
//! directly and leave no activity trail.

use axum::{extract::State, http::StatusCode, Json};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::password_service::PasswordService;
use crate::shared::api_common::{ApiError, SuccessResponse};
use crate::shared::error::{Result, StoreError};
use crate::shared::middleware::Authenticated;
use crate::user::entity::User;
use crate::user::repository::UserRepository;

/// Email validation pattern
fn email_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

/// Shared state for user endpoints.
#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<UserRepository>,
    pub password_service: Arc<PasswordService>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Field-level validation; returns the normalized email.
    fn validate(&self) -> Result<String> {
        if self.firstname.trim().is_empty() || self.lastname.trim().is_empty() {
            return Err(StoreError::validation("Firstname and lastname are required"));
        }
        let email = self.email.trim().to_lowercase();
        if !email_pattern().is_match(&email) {
            return Err(StoreError::validation("Invalid email address format"));
        }
        Ok(email)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Register a new storefront customer.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
    ),
    tag = "users"
)]
pub async fn signup(
    State(state): State<UsersState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let email = request.validate()?;
    state.password_service.validate_password(&request.password)?;

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(StoreError::duplicate("User", "email", &email));
    }

    let password_hash = state.password_service.hash_password(&request.password)?;
    let user = User::new(
        request.firstname.trim(),
        request.lastname.trim(),
        &email,
        password_hash,
    );
    state.user_repo.insert(&user).await?;

    info!(user_id = %user.id, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
        }),
    ))
}

/// Change the authenticated user's password.
#[utoipa::path(
    patch,
    path = "/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 400, description = "Wrong password or weak replacement", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn change_password(
    State(state): State<UsersState>,
    Authenticated(principal): Authenticated,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>> {
    let user = state
        .user_repo
        .find_by_id(&principal.id)
        .await?
        .ok_or_else(|| StoreError::not_found("User", &principal.id))?;

    let matches = state
        .password_service
        .verify_password(&request.old_password, &user.password)?;
    if !matches {
        return Err(StoreError::validation("wrong password"));
    }

    state.password_service.validate_password(&request.new_password)?;
    let password_hash = state.password_service.hash_password(&request.new_password)?;
    state.user_repo.update_password(&user.id, &password_hash).await?;

    info!(user_id = %user.id, "User changed password");
    Ok(Json(SuccessResponse::with_message("success")))
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "User not found", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn profile(
    State(state): State<UsersState>,
    Authenticated(principal): Authenticated,
) -> Result<Json<UserProfile>> {
    let user = state
        .user_repo
        .find_by_id(&principal.id)
        .await?
        .ok_or_else(|| StoreError::not_found("User", &principal.id))?;

    Ok(Json(UserProfile::from(user)))
}

/// Create the users router
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(signup))
        .routes(routes!(change_password))
        .routes(routes!(profile))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(firstname: &str, email: &str) -> SignupRequest {
        SignupRequest {
            firstname: firstname.to_string(),
            lastname: "Obi".to_string(),
            email: email.to_string(),
            password: "SecurePass123".to_string(),
        }
    }

    #[test]
    fn test_signup_validation_normalizes_email() {
        let email = request("Ada", " Ada@Store.NG ").validate().unwrap();
        assert_eq!(email, "ada@store.ng");
    }

    #[test]
    fn test_signup_validation_rejects_blank_names() {
        let err = request("  ", "ada@store.ng").validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_signup_validation_rejects_bad_email() {
        let err = request("Ada", "not-an-email").validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_profile_omits_password() {
        let user = User::new("Ada", "Obi", "ada@store.ng", "$argon2id$hash");
        let profile = UserProfile::from(user);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["email"], "ada@store.ng");
        assert!(json.get("password").is_none());
    }
}
