//! Storefront customer entity. Customers authenticate through the same
//! token authority as admins but carry the CLIENT principal kind and no
//! back-office role.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::usecase::unit_of_work::HasId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub firstname: String,

    pub lastname: String,

    /// Unique, stored lowercased
    pub email: String,

    /// Argon2id hash
    pub password: String,

    pub status: UserStatus,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into().trim().to_lowercase(),
            password: password_hash.into(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "users"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("Ada", "Obi", " Ada@Store.NG ", "hash");
        assert_eq!(user.email, "ada@store.ng");
        assert!(user.is_active());
        assert_eq!(User::collection_name(), "users");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Deleted).unwrap(),
            "\"DELETED\""
        );
    }
}
