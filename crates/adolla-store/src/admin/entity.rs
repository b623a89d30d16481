//! Admin Entity
//!
//! Back-office administrator principal. Admins authenticate with
//! email + password and carry a role; SUPER_ADMIN is reserved for the
//! bootstrapped account.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use utoipa::ToSchema;

use crate::usecase::unit_of_work::HasId;

/// Admin account status. Deleted accounts stay in the collection but
/// can no longer authenticate or pass the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminStatus {
    Active,
    Deleted,
}

/// Admin role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
}

impl Default for AdminRole {
    fn default() -> Self {
        Self::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// ObjectId hex string
    #[serde(rename = "_id")]
    pub id: String,

    pub firstname: String,

    pub lastname: String,

    /// Unique, stored lowercased
    pub email: String,

    /// Argon2id hash, never the raw password
    pub password: String,

    pub status: AdminStatus,

    pub role: AdminRole,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: AdminRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into().trim().to_lowercase(),
            password: password_hash.into(),
            status: AdminStatus::Active,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AdminStatus::Active
    }
}

impl HasId for Admin {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "admins"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_defaults() {
        let admin = Admin::new("Jane", "Doe", "  Jane@Example.COM ", "$argon2id$hash", AdminRole::Admin);

        assert_eq!(admin.email, "jane@example.com");
        assert_eq!(admin.status, AdminStatus::Active);
        assert!(admin.is_active());
        assert!(!admin.id.is_empty());
        assert_eq!(Admin::collection_name(), "admins");
    }

    #[test]
    fn test_bson_field_names() {
        let admin = Admin::new("Jane", "Doe", "jane@example.com", "hash", AdminRole::SuperAdmin);
        let doc = bson::to_document(&admin).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("createdAt"));
        assert!(doc.contains_key("updatedAt"));
        assert_eq!(doc.get_str("status").unwrap(), "ACTIVE");
        assert_eq!(doc.get_str("role").unwrap(), "SUPER_ADMIN");
    }
}
