//! User Repository
//!
//! Customer self-service writes (signup, password change) live here;
//! users are not administrative aggregates and leave no activity trail.

use chrono::Utc;
use mongodb::{bson::doc, Collection, Database};

use crate::shared::error::Result;
use crate::usecase::unit_of_work::HasId;
use crate::user::entity::User;

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(User::collection_name()),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Lookup used by the auth gateway: status must still be ACTIVE.
    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "status": "ACTIVE" })
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "password": password_hash,
                    "updatedAt": bson::DateTime::from_chrono(Utc::now()),
                }},
            )
            .await?;
        Ok(())
    }
}
