//! Create Product Use Case

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::audit::entity::{ActivityAction, ActivityRecord};
use crate::category::repository::CategoryRepository;
use crate::details;
use crate::product::entity::{Price, Product};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for creating a new product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductCommand {
    /// Existing category the product belongs to
    pub category_id: String,

    pub title: String,

    pub description: String,

    pub price: Price,

    /// Units in stock
    pub quantity: i64,
}

/// Use case for creating a new product.
pub struct CreateProductUseCase<U: UnitOfWork> {
    category_repo: Arc<CategoryRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateProductUseCase<U> {
    pub fn new(category_repo: Arc<CategoryRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            category_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateProductCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ActivityRecord> {
        // Validation: title and category are required
        if command.title.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Product title is required",
            ));
        }
        if command.category_id.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "CATEGORY_REQUIRED",
                "Category ID is required",
            ));
        }
        if command.price.amount < 0.0 {
            return UseCaseResult::failure(UseCaseError::validation(
                "INVALID_PRICE",
                "Price amount must not be negative",
            ));
        }
        if command.quantity < 0 {
            return UseCaseResult::failure(UseCaseError::validation(
                "INVALID_QUANTITY",
                "Quantity must not be negative",
            ));
        }

        // Business rule: the referenced category must exist. A lookup
        // failure is a 500, not a missing category.
        match self.category_repo.find_by_id(&command.category_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::validation_with_details(
                    "CATEGORY_NOT_FOUND",
                    format!("No category with id '{}'", command.category_id),
                    details! { "categoryId" => &command.category_id },
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "500:-DBError:-Failed to load category: {}",
                    e
                )));
            }
        }

        let product = Product::new(
            &command.category_id,
            command.title.trim(),
            command.description.trim(),
            command.price,
            command.quantity,
        );

        let activity = ActivityRecord::new(
            &ctx.admin_id,
            ActivityAction::AddProduct,
            "Added New product.",
        )
        .with_product(&product.id)
        .with_snapshot(&command);

        // Atomic commit
        self.unit_of_work.commit(&product, activity).await
    }
}
