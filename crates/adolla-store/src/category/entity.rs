//! Product Category Entity
//!
//! Titles are unique and stored lowercased so "Phones" and "phones"
//! count as the same category.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::usecase::unit_of_work::HasId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique, lowercased
    pub title: String,

    pub description: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ProductCategory {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            title: title.into().trim().to_lowercase(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl HasId for ProductCategory {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "product_categories"
    }
}
