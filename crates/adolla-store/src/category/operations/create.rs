//! Create Category Use Case

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::audit::entity::{ActivityAction, ActivityRecord};
use crate::category::entity::ProductCategory;
use crate::category::repository::CategoryRepository;
use crate::details;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for creating a new product category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryCommand {
    /// Unique category title; matched case-insensitively
    pub title: String,

    pub description: String,
}

/// Use case for creating a product category.
pub struct CreateCategoryUseCase<U: UnitOfWork> {
    category_repo: Arc<CategoryRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateCategoryUseCase<U> {
    pub fn new(category_repo: Arc<CategoryRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            category_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateCategoryCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ActivityRecord> {
        // Validation: title is required
        let title = command.title.trim().to_lowercase();
        if title.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Category title is required",
            ));
        }

        // Business rule: title must be unique (case-insensitive). A lookup
        // failure must not pass as "unique".
        match self.category_repo.find_by_title(&title).await {
            Ok(Some(_)) => {
                return UseCaseResult::failure(UseCaseError::business_rule_with_details(
                    "CATEGORY_TITLE_EXISTS",
                    format!("A category titled '{}' already exists", title),
                    details! { "title" => &title },
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "500:-DBError:-Failed to check title uniqueness: {}",
                    e
                )));
            }
        }

        let category = ProductCategory::new(&title, command.description.trim());

        let activity = ActivityRecord::new(
            &ctx.admin_id,
            ActivityAction::AddCategory,
            "Added New Category.",
        )
        .with_category(&category.id)
        .with_snapshot(&command);

        // Atomic commit
        self.unit_of_work.commit(&category, activity).await
    }
}
