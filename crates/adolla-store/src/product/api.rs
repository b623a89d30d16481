//! Product REST API
//!
//! Catalog mutations, all admin-only behind the gateway. Category
//! creation lives under the products namespace.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::category::operations::{CreateCategoryCommand, CreateCategoryUseCase};
use crate::product::operations::{
    CreateProductCommand, CreateProductUseCase, DeleteProductUseCase, UpdateProductCommand,
    UpdateProductUseCase,
};
use crate::shared::api_common::{ApiError, CreatedResponse, SuccessResponse};
use crate::shared::error::{Result, StoreError};
use crate::shared::middleware::Authenticated;
use crate::usecase::{ExecutionContext, MongoUnitOfWork};

/// Shared state for product endpoints.
#[derive(Clone)]
pub struct ProductsState {
    pub create_use_case: Arc<CreateProductUseCase<MongoUnitOfWork>>,
    pub update_use_case: Arc<UpdateProductUseCase<MongoUnitOfWork>>,
    pub delete_use_case: Arc<DeleteProductUseCase<MongoUnitOfWork>>,
    pub create_category_use_case: Arc<CreateCategoryUseCase<MongoUnitOfWork>>,
}

/// Create a new product.
#[utoipa::path(
    post,
    path = "",
    request_body = CreateProductCommand,
    responses(
        (status = 201, description = "Product created", body = CreatedResponse),
        (status = 400, description = "Validation error", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<ProductsState>,
    Authenticated(principal): Authenticated,
    Json(command): Json<CreateProductCommand>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let ctx = ExecutionContext::create(&principal.id);
    let activity = state
        .create_use_case
        .execute(command, ctx)
        .await
        .into_result()
        .map_err(StoreError::from)?;

    let product_id = activity.extra_details.product_id.clone().unwrap_or_default();
    info!(admin_id = %principal.id, product_id = %product_id, "Product created");

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(product_id))))
}

/// Update product fields.
#[utoipa::path(
    patch,
    path = "/{product_id}",
    params(("product_id" = String, Path, description = "Product ID")),
    request_body = UpdateProductCommand,
    responses(
        (status = 200, description = "Product updated", body = SuccessResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<ProductsState>,
    Authenticated(principal): Authenticated,
    Path(product_id): Path<String>,
    Json(command): Json<UpdateProductCommand>,
) -> Result<Json<SuccessResponse>> {
    let ctx = ExecutionContext::create(&principal.id);
    state
        .update_use_case
        .execute(&product_id, command, ctx)
        .await
        .into_result()
        .map_err(StoreError::from)?;

    info!(admin_id = %principal.id, product_id = %product_id, "Product updated");
    Ok(Json(SuccessResponse::ok()))
}

/// Soft-delete a product.
#[utoipa::path(
    delete,
    path = "/{product_id}",
    params(("product_id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = SuccessResponse),
        (status = 404, description = "Product not found", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<ProductsState>,
    Authenticated(principal): Authenticated,
    Path(product_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let ctx = ExecutionContext::create(&principal.id);
    state
        .delete_use_case
        .execute(&product_id, ctx)
        .await
        .into_result()
        .map_err(StoreError::from)?;

    info!(admin_id = %principal.id, product_id = %product_id, "Product deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Create a new product category.
#[utoipa::path(
    post,
    path = "/category",
    request_body = CreateCategoryCommand,
    responses(
        (status = 201, description = "Category created", body = CreatedResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Title already in use", body = ApiError),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_category(
    State(state): State<ProductsState>,
    Authenticated(principal): Authenticated,
    Json(command): Json<CreateCategoryCommand>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let ctx = ExecutionContext::create(&principal.id);
    let activity = state
        .create_category_use_case
        .execute(command, ctx)
        .await
        .into_result()
        .map_err(StoreError::from)?;

    let category_id = activity.extra_details.category_id.clone().unwrap_or_default();
    info!(admin_id = %principal.id, category_id = %category_id, "Category created");

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(category_id))))
}

/// Create the products router
pub fn products_router(state: ProductsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_product))
        .routes(routes!(update_product, delete_product))
        .routes(routes!(create_category))
        .with_state(state)
}
