//! Update Product Use Case

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::audit::entity::{ActivityAction, ActivityRecord};
use crate::category::repository::CategoryRepository;
use crate::details;
use crate::product::entity::Price;
use crate::product::repository::ProductRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for partially updating a product. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

/// Use case for updating product fields.
pub struct UpdateProductUseCase<U: UnitOfWork> {
    product_repo: Arc<ProductRepository>,
    category_repo: Arc<CategoryRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateProductUseCase<U> {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        category_repo: Arc<CategoryRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            product_repo,
            category_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        product_id: &str,
        command: UpdateProductCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ActivityRecord> {
        // Validation on the supplied fields
        if let Some(ref title) = command.title {
            if title.trim().is_empty() {
                return UseCaseResult::failure(UseCaseError::validation(
                    "TITLE_REQUIRED",
                    "Product title must not be blank",
                ));
            }
        }
        if let Some(ref price) = command.price {
            if price.amount < 0.0 {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_PRICE",
                    "Price amount must not be negative",
                ));
            }
        }
        if let Some(quantity) = command.quantity {
            if quantity < 0 {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_QUANTITY",
                    "Quantity must not be negative",
                ));
            }
        }

        let mut product = match self.product_repo.find_active_by_id(product_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found_with_details(
                    "PRODUCT_NOT_FOUND",
                    format!("No active product with id '{}'", product_id),
                    details! { "productId" => product_id },
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "500:-DBError:-Failed to load product: {}",
                    e
                )));
            }
        };

        // A category change must point at an existing category
        if let Some(ref category_id) = command.category_id {
            match self.category_repo.find_by_id(category_id).await {
                Ok(Some(_)) => product.category_id = category_id.clone(),
                Ok(None) => {
                    return UseCaseResult::failure(UseCaseError::validation_with_details(
                        "CATEGORY_NOT_FOUND",
                        format!("No category with id '{}'", category_id),
                        details! { "categoryId" => category_id },
                    ));
                }
                Err(e) => {
                    return UseCaseResult::failure(UseCaseError::commit(format!(
                        "500:-DBError:-Failed to load category: {}",
                        e
                    )));
                }
            }
        }

        if let Some(ref title) = command.title {
            product.title = title.trim().to_string();
        }
        if let Some(ref description) = command.description {
            product.description = description.trim().to_string();
        }
        if let Some(price) = command.price {
            product.price = price;
        }
        if let Some(quantity) = command.quantity {
            product.quantity = quantity;
        }
        product.touch();

        let activity = ActivityRecord::new(
            &ctx.admin_id,
            ActivityAction::EditProduct,
            "Modified product",
        )
        .with_product(&product.id)
        .with_snapshot(&command);

        // Atomic commit
        self.unit_of_work.commit(&product, activity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::entity::Currency;
    use crate::usecase::unit_of_work::InMemoryUnitOfWork;

    async fn use_case() -> UpdateProductUseCase<InMemoryUnitOfWork> {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let db = client.database("usecase-tests");
        UpdateProductUseCase::new(
            Arc::new(ProductRepository::new(&db)),
            Arc::new(CategoryRepository::new(&db)),
            Arc::new(InMemoryUnitOfWork::new()),
        )
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let command = UpdateProductCommand {
            category_id: None,
            title: Some("  ".to_string()),
            description: None,
            price: None,
            quantity: None,
        };

        let result = use_case()
            .await
            .execute("prod-1", command, ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().code(), "TITLE_REQUIRED");
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let command = UpdateProductCommand {
            category_id: None,
            title: None,
            description: None,
            price: Some(Price {
                amount: -5.0,
                currency: Currency::Gbp,
            }),
            quantity: None,
        };

        let result = use_case()
            .await
            .execute("prod-1", command, ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().code(), "INVALID_PRICE");
    }

    #[tokio::test]
    async fn test_db_error_during_product_fetch_is_not_a_404() {
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500",
        )
        .await
        .unwrap();
        let db = client.database("usecase-tests");
        let use_case = UpdateProductUseCase::new(
            Arc::new(ProductRepository::new(&db)),
            Arc::new(CategoryRepository::new(&db)),
            Arc::new(InMemoryUnitOfWork::new()),
        );

        let command = UpdateProductCommand {
            category_id: None,
            title: Some("New Title".to_string()),
            description: None,
            price: None,
            quantity: None,
        };
        let result = use_case
            .execute("prod-1", command, ExecutionContext::create("admin-0"))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), "COMMIT_FAILED");
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_absent_fields_skipped_in_snapshot() {
        let command = UpdateProductCommand {
            category_id: None,
            title: Some("New Title".to_string()),
            description: None,
            price: None,
            quantity: Some(7),
        };
        let json = serde_json::to_value(&command).unwrap();

        assert_eq!(json["title"], "New Title");
        assert_eq!(json["quantity"], 7);
        assert!(json.get("categoryId").is_none());
        assert!(json.get("price").is_none());
    }
}
