//! Unit of Work
//!
//! Atomic commit of an entity state change and its activity record
//! within a single MongoDB transaction.

use async_trait::async_trait;
use mongodb::{
    Client, Database,
    bson::{doc, Document, to_document},
};
use serde::Serialize;
use tracing::{debug, error};

use crate::audit::entity::ActivityRecord;
use super::error::UseCaseError;
use super::result::UseCaseResult;

/// Unit of Work for atomic administrative writes.
///
/// Ensures that the entity state change and its activity record are
/// committed atomically within a single MongoDB transaction.
///
/// **This is the ONLY way to create a successful `UseCaseResult`.**
/// The `UseCaseResult::success()` method is crate-private, so use cases
/// must go through UnitOfWork to return success. This guarantees that:
/// - Every committed mutation has exactly one activity record
/// - An aborted commit leaves neither the entity nor the record visible
///
/// # Usage in a use case:
///
/// ```ignore
/// pub async fn execute(&self, cmd: CreateProductCommand, ctx: ExecutionContext)
///     -> UseCaseResult<ActivityRecord>
/// {
///     // Validation - can return failure directly
///     if !is_valid(&cmd) {
///         return UseCaseResult::failure(UseCaseError::validation("INVALID", "..."));
///     }
///
///     // Create aggregate and activity record
///     let product = Product::new(...);
///     let activity = ActivityRecord::new(&ctx.admin_id, ActivityAction::AddProduct, "...");
///
///     // Atomic commit - only way to return success
///     self.unit_of_work.commit(&product, activity).await
/// }
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commit an entity change with its activity record atomically.
    ///
    /// Within a single MongoDB transaction:
    /// 1. Upserts the aggregate entity into its collection
    /// 2. Inserts the activity record into the activity collection
    ///
    /// If any step fails, the entire transaction is rolled back.
    async fn commit<T>(
        &self,
        aggregate: &T,
        activity: ActivityRecord,
    ) -> UseCaseResult<ActivityRecord>
    where
        T: Serialize + HasId + Send + Sync;
}

/// Trait for entities that have an ID field.
pub trait HasId {
    fn id(&self) -> &str;
    fn collection_name() -> &'static str;
}

/// MongoDB implementation of UnitOfWork using multi-document transactions.
///
/// # Requirements:
/// - MongoDB 4.0+ (for multi-document transactions)
/// - Replica set deployment (transactions require replica set)
/// - Aggregates must implement `HasId` trait
#[derive(Clone)]
pub struct MongoUnitOfWork {
    client: Client,
    database: Database,
}

impl MongoUnitOfWork {
    pub fn new(client: Client, database: Database) -> Self {
        Self { client, database }
    }
}

#[async_trait]
impl UnitOfWork for MongoUnitOfWork {
    async fn commit<T>(
        &self,
        aggregate: &T,
        activity: ActivityRecord,
    ) -> UseCaseResult<ActivityRecord>
    where
        T: Serialize + HasId + Send + Sync,
    {
        let mut session = match self.client.start_session().await {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to start MongoDB session: {}", e);
                return UseCaseResult::failure(UseCaseError::commit(
                    format!("500:-TransactionError:-Failed to start session: {}", e)
                ));
            }
        };

        if let Err(e) = session.start_transaction().await {
            error!("Failed to start transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("500:-TransactionError:-Failed to start transaction: {}", e)
            ));
        }

        // 1. Persist aggregate
        let collection_name = T::collection_name();
        let collection = self.database.collection::<Document>(collection_name);
        let aggregate_doc = match to_document(aggregate) {
            Ok(d) => d,
            Err(e) => {
                let _ = session.abort_transaction().await;
                return UseCaseResult::failure(UseCaseError::commit(
                    format!("500:-SerializationError:-Failed to serialize aggregate: {}", e)
                ));
            }
        };

        let id = aggregate.id();

        // Use update with $set for upsert semantics
        let update_result = collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": &aggregate_doc },
            )
            .upsert(true)
            .session(&mut session)
            .await;

        if let Err(e) = update_result {
            let _ = session.abort_transaction().await;
            error!("Failed to persist aggregate: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("500:-DBError:-Failed to persist {}: {}", collection_name, e)
            ));
        }

        // 2. Append activity record
        let activity_collection = self
            .database
            .collection::<ActivityRecord>(ActivityRecord::COLLECTION);
        if let Err(e) = activity_collection
            .insert_one(&activity)
            .session(&mut session)
            .await
        {
            let _ = session.abort_transaction().await;
            error!("Failed to insert activity record: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("500:-ActivityRecordError:-Failed to append activity record: {}", e)
            ));
        }

        // Commit transaction
        if let Err(e) = session.commit_transaction().await {
            error!("Failed to commit transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("500:-TransactionError:-Failed to commit transaction: {}", e)
            ));
        }

        debug!(
            activity_id = %activity.id,
            action = ?activity.action,
            collection = collection_name,
            "Successfully committed transaction"
        );

        UseCaseResult::success(activity)
    }
}

/// A unit recorded by [`InMemoryUnitOfWork`].
#[cfg(test)]
pub struct CommittedUnit {
    pub collection: &'static str,
    pub aggregate: serde_json::Value,
    pub activity: ActivityRecord,
}

/// In-memory UnitOfWork for testing.
#[cfg(test)]
pub struct InMemoryUnitOfWork {
    pub committed: std::sync::Mutex<Vec<CommittedUnit>>,
}

#[cfg(test)]
impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self {
            committed: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn committed_count(&self) -> usize {
        self.committed.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit<T>(
        &self,
        aggregate: &T,
        activity: ActivityRecord,
    ) -> UseCaseResult<ActivityRecord>
    where
        T: Serialize + HasId + Send + Sync,
    {
        self.committed.lock().unwrap().push(CommittedUnit {
            collection: T::collection_name(),
            aggregate: serde_json::to_value(aggregate).unwrap_or(serde_json::Value::Null),
            activity: activity.clone(),
        });
        UseCaseResult::success(activity)
    }
}

/// UnitOfWork that fails every commit, for atomicity tests.
#[cfg(test)]
pub struct FailingUnitOfWork;

#[cfg(test)]
#[async_trait]
impl UnitOfWork for FailingUnitOfWork {
    async fn commit<T>(
        &self,
        _aggregate: &T,
        _activity: ActivityRecord,
    ) -> UseCaseResult<ActivityRecord>
    where
        T: Serialize + HasId + Send + Sync,
    {
        UseCaseResult::failure(UseCaseError::commit(
            "500:-ActivityRecordError:-Failed to append activity record: simulated failure",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entity::{ActivityAction, ActivityRecord};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Widget {
        #[serde(rename = "_id")]
        id: String,
        title: String,
    }

    impl HasId for Widget {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection_name() -> &'static str {
            "widgets"
        }
    }

    #[tokio::test]
    async fn test_in_memory_commit_records_unit() {
        let uow = InMemoryUnitOfWork::new();
        let widget = Widget {
            id: "w1".to_string(),
            title: "thing".to_string(),
        };
        let activity =
            ActivityRecord::new("admin-1", ActivityAction::AddProduct, "Added New product.");

        let result = uow.commit(&widget, activity).await;
        assert!(result.is_success());

        let committed = uow.committed.lock().unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].collection, "widgets");
        assert_eq!(committed[0].aggregate["title"], "thing");
        assert_eq!(committed[0].activity.admin_id, "admin-1");
    }

    #[tokio::test]
    async fn test_failing_commit_yields_commit_error() {
        let uow = FailingUnitOfWork;
        let widget = Widget {
            id: "w1".to_string(),
            title: "thing".to_string(),
        };
        let activity =
            ActivityRecord::new("admin-1", ActivityAction::AddProduct, "Added New product.");

        let result = uow.commit(&widget, activity).await;
        let err = result.unwrap_err();
        assert_eq!(err.code(), "COMMIT_FAILED");
        assert_eq!(err.http_status_code(), 500);
    }
}
