//! Admin REST API
//!
//! Admin creation and the per-admin activity trail. Both routes sit
//! behind the admin-only gateway policy.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::admin::operations::{CreateAdminCommand, CreateAdminUseCase};
use crate::admin::repository::AdminRepository;
use crate::audit::entity::{ActivityAction, ActivityRecord, ExtraDetails};
use crate::audit::repository::ActivityRecordRepository;
use crate::shared::api_common::{ApiError, CreatedResponse, PaginatedResponse, PaginationParams};
use crate::shared::error::{Result, StoreError};
use crate::shared::middleware::Authenticated;
use crate::usecase::{ExecutionContext, MongoUnitOfWork};

/// Shared state for admin endpoints.
#[derive(Clone)]
pub struct AdminsState {
    pub admin_repo: Arc<AdminRepository>,
    pub activity_repo: Arc<ActivityRecordRepository>,
    pub create_use_case: Arc<CreateAdminUseCase<MongoUnitOfWork>>,
}

/// One activity trail entry as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub id: String,
    pub admin_id: String,
    pub action: ActivityAction,
    pub comment: String,
    pub extra_details: ExtraDetails,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            admin_id: record.admin_id,
            action: record.action,
            comment: record.comment,
            extra_details: record.extra_details,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Create a new admin account.
#[utoipa::path(
    post,
    path = "",
    request_body = CreateAdminCommand,
    responses(
        (status = 201, description = "Admin created", body = CreatedResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Email already in use", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_admin(
    State(state): State<AdminsState>,
    Authenticated(principal): Authenticated,
    Json(command): Json<CreateAdminCommand>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let ctx = ExecutionContext::create(&principal.id);
    let activity = state
        .create_use_case
        .execute(command, ctx)
        .await
        .into_result()
        .map_err(StoreError::from)?;

    let new_admin_id = activity.extra_details.admin_id.clone().unwrap_or_default();
    info!(admin_id = %principal.id, new_admin_id = %new_admin_id, "Admin created");

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(new_admin_id))))
}

/// Page through an admin's activity trail, newest first.
#[utoipa::path(
    get,
    path = "/{admin_id}/activity-trail",
    params(
        ("admin_id" = String, Path, description = "Admin ID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Activity trail page", body = PaginatedResponse<ActivityResponse>),
        (status = 404, description = "Admin not found", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn activity_trail(
    State(state): State<AdminsState>,
    Path(admin_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<ActivityResponse>>> {
    if state.admin_repo.find_by_id(&admin_id).await?.is_none() {
        return Err(StoreError::not_found("Admin", &admin_id));
    }

    let records = state
        .activity_repo
        .find_by_admin(&admin_id, params.skip(), params.limit_i64())
        .await?;
    let total = state.activity_repo.count_by_admin(&admin_id).await?;

    let data = records.into_iter().map(ActivityResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page_number(),
        params.limit(),
        total,
    )))
}

/// Create the admin router
pub fn admins_router(state: AdminsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_admin))
        .routes(routes!(activity_trail))
        .with_state(state)
}
