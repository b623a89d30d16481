//! Admin Repository
//!
//! Writes go through `UnitOfWork::commit`; this repository covers reads
//! the gateway and use cases need.

use mongodb::{bson::doc, Collection, Database};

use crate::admin::entity::Admin;
use crate::shared::error::Result;
use crate::usecase::unit_of_work::HasId;

pub struct AdminRepository {
    collection: Collection<Admin>,
}

impl AdminRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(Admin::collection_name()),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Admin>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Lookup used by the auth gateway: status must still be ACTIVE.
    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<Admin>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "status": "ACTIVE" })
            .await?)
    }

    /// Emails are stored lowercased; callers normalize before lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }
}
