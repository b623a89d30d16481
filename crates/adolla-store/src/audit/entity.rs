//! Activity Record Entity
//!
//! Records every administrative mutation for the per-admin activity trail.
//! Written exclusively by `UnitOfWork::commit`, in the same transaction as
//! the entity change it describes.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use utoipa::ToSchema;

/// Administrative action recorded in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    /// Admin account created
    AddAdmin,
    /// Product created
    AddProduct,
    /// Product fields modified
    EditProduct,
    /// Product soft-deleted
    DeleteProduct,
    /// Product category created
    AddCategory,
}

/// Structured references to the entities an activity touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,

    /// Free-form snapshot of the command that caused the activity
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub more: serde_json::Value,
}

/// One entry in an admin's activity trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// ObjectId hex string
    #[serde(rename = "_id")]
    pub id: String,

    /// Admin who performed the action
    pub admin_id: String,

    /// What was done
    #[serde(rename = "type")]
    pub action: ActivityAction,

    /// Human-readable description
    pub comment: String,

    /// Entity references and command snapshot
    #[serde(default)]
    pub extra_details: ExtraDetails,

    /// When the action was committed
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub const COLLECTION: &'static str = "admin_activities";

    /// Create a new activity record for the given admin and action.
    pub fn new(
        admin_id: impl Into<String>,
        action: ActivityAction,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            admin_id: admin_id.into(),
            action,
            comment: comment.into(),
            extra_details: ExtraDetails::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.extra_details.product_id = Some(product_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.extra_details.category_id = Some(category_id.into());
        self
    }

    pub fn with_admin(mut self, admin_id: impl Into<String>) -> Self {
        self.extra_details.admin_id = Some(admin_id.into());
        self
    }

    /// Attach the command snapshot that caused this activity.
    pub fn with_snapshot<C: Serialize>(mut self, command: &C) -> Self {
        self.extra_details.more =
            serde_json::to_value(command).unwrap_or(serde_json::Value::Null);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        assert_eq!(
            serde_json::to_string(&ActivityAction::AddAdmin).unwrap(),
            "\"ADD_ADMIN\""
        );
        assert_eq!(
            serde_json::to_string(&ActivityAction::EditProduct).unwrap(),
            "\"EDIT_PRODUCT\""
        );
        assert_eq!(
            serde_json::to_string(&ActivityAction::DeleteProduct).unwrap(),
            "\"DELETE_PRODUCT\""
        );
    }

    #[test]
    fn test_record_builder() {
        let record = ActivityRecord::new("admin-1", ActivityAction::AddProduct, "Added New product.")
            .with_product("prod-9")
            .with_snapshot(&serde_json::json!({ "title": "phone" }));

        assert_eq!(record.admin_id, "admin-1");
        assert_eq!(record.extra_details.product_id.as_deref(), Some("prod-9"));
        assert_eq!(record.extra_details.more["title"], "phone");
        assert!(record.extra_details.category_id.is_none());
    }

    #[test]
    fn test_bson_field_names() {
        let record = ActivityRecord::new("admin-1", ActivityAction::AddCategory, "Added New Category.")
            .with_category("cat-3");
        let doc = bson::to_document(&record).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("adminId"));
        assert!(doc.contains_key("createdAt"));
        assert_eq!(doc.get_str("type").unwrap(), "ADD_CATEGORY");
        assert_eq!(
            doc.get_document("extraDetails").unwrap().get_str("categoryId").unwrap(),
            "cat-3"
        );
    }
}
