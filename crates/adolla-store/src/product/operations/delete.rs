//! Delete Product Use Case
//!
//! Soft delete. The document stays in its collection with status
//! DELETED and a `deletedAt` stamp; deleting an already-deleted product
//! simply refreshes the stamp.

use std::sync::Arc;

use crate::audit::entity::{ActivityAction, ActivityRecord};
use crate::details;
use crate::product::repository::ProductRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Use case for soft-deleting a product.
pub struct DeleteProductUseCase<U: UnitOfWork> {
    product_repo: Arc<ProductRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteProductUseCase<U> {
    pub fn new(product_repo: Arc<ProductRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            product_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        product_id: &str,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ActivityRecord> {
        // Any status: re-deleting refreshes the stamp rather than 404ing
        let mut product = match self.product_repo.find_by_id(product_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found_with_details(
                    "PRODUCT_NOT_FOUND",
                    format!("No product with id '{}'", product_id),
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

        product.mark_deleted();

        let activity = ActivityRecord::new(
            &ctx.admin_id,
            ActivityAction::DeleteProduct,
            "Deleted product.",
        )
        .with_product(&product.id)
        .with_snapshot(&product);

        // Atomic commit
        self.unit_of_work.commit(&product, activity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::entity::{Currency, Price, Product};
    use crate::usecase::unit_of_work::{InMemoryUnitOfWork, UnitOfWork};

    #[tokio::test]
    async fn test_db_error_during_product_fetch_is_not_a_404() {
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500",
        )
        .await
        .unwrap();
        let repo = Arc::new(ProductRepository::new(&client.database("usecase-tests")));
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let use_case = DeleteProductUseCase::new(repo, uow.clone());

        let result = use_case
            .execute("prod-1", ExecutionContext::create("admin-0"))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), "COMMIT_FAILED");
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(uow.committed_count(), 0);
    }

    #[tokio::test]
    async fn test_committed_delete_records_activity_with_product_id() {
        let uow = InMemoryUnitOfWork::new();
        let mut product = Product::new(
            "cat-1",
            "Wireless Mouse",
            "A mouse without wires",
            Price {
                amount: 45.0,
                currency: Currency::Usd,
            },
            12,
        );
        product.mark_deleted();

        let activity = ActivityRecord::new("admin-1", ActivityAction::DeleteProduct, "Deleted product.")
            .with_product(&product.id)
            .with_snapshot(&product);
        let result = uow.commit(&product, activity).await;

        let activity = result.unwrap();
        assert_eq!(activity.action, ActivityAction::DeleteProduct);
        assert_eq!(activity.comment, "Deleted product.");
        assert_eq!(activity.extra_details.product_id.as_deref(), Some(product.id.as_str()));

        let committed = uow.committed.lock().unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].collection, "products");
        assert_eq!(committed[0].aggregate["status"], "DELETED");
    }
}
