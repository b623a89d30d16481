//! Product Repository

use mongodb::{bson::doc, Collection, Database};

use crate::product::entity::Product;
use crate::shared::error::Result;
use crate::usecase::unit_of_work::HasId;

pub struct ProductRepository {
    collection: Collection<Product>,
}

impl ProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(Product::collection_name()),
        }
    }

    /// Finds products of any status, including soft-deleted ones.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_active_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "status": "ACTIVE" })
            .await?)
    }
}
