//! Activity Record Repository
//!
//! Read-only by design. The only write path for activity records is
//! `UnitOfWork::commit`, which keeps the trail append-only and tied to
//! the mutations it describes.

use mongodb::{Collection, Database, bson::doc, options::FindOptions};
use futures::TryStreamExt;
use crate::audit::entity::ActivityRecord;
use crate::shared::error::Result;

pub struct ActivityRecordRepository {
    collection: Collection<ActivityRecord>,
}

impl ActivityRecordRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ActivityRecord::COLLECTION),
        }
    }

    /// Page through an admin's trail, newest first.
    pub async fn find_by_admin(
        &self,
        admin_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .build();

        let cursor = self.collection
            .find(doc! { "adminId": admin_id })
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_by_admin(&self, admin_id: &str) -> Result<u64> {
        Ok(self.collection.count_documents(doc! { "adminId": admin_id }).await?)
    }
}
