//! Product Category Repository

use mongodb::{bson::doc, Collection, Database};

use crate::category::entity::ProductCategory;
use crate::shared::error::Result;
use crate::usecase::unit_of_work::HasId;

pub struct CategoryRepository {
    collection: Collection<ProductCategory>,
}

impl CategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ProductCategory::collection_name()),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ProductCategory>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Titles are stored lowercased; callers normalize before lookup.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<ProductCategory>> {
        Ok(self.collection.find_one(doc! { "title": title }).await?)
    }
}
