//! Product Entity
//!
//! Catalog product with a price, stock quantity and a category
//! reference. Products are soft-deleted: a delete flips the status to
//! DELETED and stamps `deletedAt`, the document stays in place.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::usecase::unit_of_work::HasId;

mod optional_bson_datetime {
    use bson::DateTime as BsonDateTime;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value
            .map(BsonDateTime::from_chrono)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<BsonDateTime>::deserialize(deserializer)?.map(BsonDateTime::to_chrono))
    }
}

/// Supported price currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Ngn,
    Gbp,
    Yen,
    Usd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Price {
    pub amount: f64,
    pub currency: Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,

    /// References a `product_categories` document
    pub category_id: String,

    pub title: String,

    pub description: String,

    pub price: Price,

    /// Units in stock
    pub quantity: i64,

    pub status: ProductStatus,

    /// Set when the product is soft-deleted
    #[serde(default, with = "optional_bson_datetime", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        category_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        quantity: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            category_id: category_id.into(),
            title: title.into(),
            description: description.into(),
            price,
            quantity,
            status: ProductStatus::Active,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == ProductStatus::Deleted
    }

    /// Soft-delete: repeated deletes refresh the `deletedAt` stamp.
    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.status = ProductStatus::Deleted;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl HasId for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "products"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product::new(
            "cat-1",
            "Wireless Mouse",
            "A mouse without wires",
            Price {
                amount: 45.0,
                currency: Currency::Usd,
            },
            12,
        )
    }

    #[test]
    fn test_new_product_defaults() {
        let product = sample_product();
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.deleted_at.is_none());
        assert!(!product.is_deleted());
        assert_eq!(Product::collection_name(), "products");
    }

    #[test]
    fn test_mark_deleted_sets_stamp() {
        let mut product = sample_product();
        product.mark_deleted();

        assert!(product.is_deleted());
        assert!(product.deleted_at.is_some());

        // Deleting again refreshes the stamp rather than failing
        let first = product.deleted_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        product.mark_deleted();
        assert!(product.deleted_at >= first);
    }

    #[test]
    fn test_currency_wire_format() {
        assert_eq!(serde_json::to_string(&Currency::Ngn).unwrap(), "\"NGN\"");
        assert_eq!(serde_json::to_string(&Currency::Yen).unwrap(), "\"YEN\"");
    }

    #[test]
    fn test_bson_field_names() {
        let product = sample_product();
        let doc = bson::to_document(&product).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("categoryId"));
        assert!(doc.contains_key("createdAt"));
        // Absent until soft-deleted
        assert!(!doc.contains_key("deletedAt"));

        let mut deleted = sample_product();
        deleted.mark_deleted();
        let doc = bson::to_document(&deleted).unwrap();
        assert!(doc.contains_key("deletedAt"));
        assert_eq!(doc.get_str("status").unwrap(), "DELETED");
    }
}
