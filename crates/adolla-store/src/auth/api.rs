//! Login endpoints for both principal kinds.
//!
//! `POST /login` authenticates a storefront customer, `POST /admin-login`
//! a back-office admin. Both verify the Argon2id hash and hand back a
//! bearer token scoped to the matching principal kind.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::admin::repository::AdminRepository;
use crate::auth::auth_service::{AuthService, PrincipalKind};
use crate::auth::password_service::PasswordService;
use crate::shared::api_common::ApiError;
use crate::shared::error::{Result, StoreError};
use crate::user::repository::UserRepository;

/// Shared state for the auth endpoints.
#[derive(Clone)]
pub struct AuthState {
    pub admin_repo: Arc<AdminRepository>,
    pub user_repo: Arc<UserRepository>,
    pub auth_service: Arc<AuthService>,
    pub password_service: Arc<PasswordService>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoggedInUser {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoggedInUser,
}

/// Authenticate a storefront customer.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Wrong credentials", body = ApiError),
        (status = 403, description = "Account deleted", body = ApiError),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = request.email.trim().to_lowercase();

    let user = state
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| StoreError::validation("wrong user credentials"))?;

    if !user.is_active() {
        return Err(StoreError::forbidden("account deleted"));
    }

    let matches = state
        .password_service
        .verify_password(&request.password, &user.password)?;
    if !matches {
        return Err(StoreError::validation("wrong user credentials"));
    }

    let access_token = state.auth_service.sign_token(&user.id, PrincipalKind::Client)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: LoggedInUser {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
        },
    }))
}

/// Authenticate a back-office admin.
#[utoipa::path(
    post,
    path = "/admin-login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Wrong credentials", body = ApiError),
        (status = 403, description = "Account deleted", body = ApiError),
    ),
    tag = "auth"
)]
pub async fn admin_login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = request.email.trim().to_lowercase();

    let admin = state
        .admin_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| StoreError::validation("wrong user credentials"))?;

    if !admin.is_active() {
        return Err(StoreError::forbidden("account deleted"));
    }

    let matches = state
        .password_service
        .verify_password(&request.password, &admin.password)?;
    if !matches {
        return Err(StoreError::validation("wrong user credentials"));
    }

    let access_token = state.auth_service.sign_token(&admin.id, PrincipalKind::Admin)?;
    info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: LoggedInUser {
            id: admin.id,
            firstname: admin.firstname,
            lastname: admin.lastname,
            email: admin.email,
        },
    }))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(admin_login))
        .with_state(state)
}
