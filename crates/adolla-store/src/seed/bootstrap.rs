//! Bootstrap Seeder
//!
//! Idempotent startup seeding of the SUPER_ADMIN account. Keyed on the
//! email, so repeated startups refresh the account rather than
//! duplicating it.

use bson::oid::ObjectId;
use chrono::Utc;
use mongodb::{
    bson::{doc, Document},
    Database,
};
use std::sync::Arc;
use tracing::info;

use crate::auth::password_service::PasswordService;
use crate::shared::error::Result;

/// Identity seeded for the bootstrap super admin.
#[derive(Debug, Clone)]
pub struct BootstrapIdentity {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl Default for BootstrapIdentity {
    fn default() -> Self {
        Self {
            firstname: "Super".to_string(),
            lastname: "Admin".to_string(),
            email: "admin@adolla.store".to_string(),
            password: "P@ssw0rd".to_string(),
        }
    }
}

pub struct BootstrapSeeder {
    db: Database,
    password_service: Arc<PasswordService>,
}

impl BootstrapSeeder {
    pub fn new(db: Database, password_service: Arc<PasswordService>) -> Self {
        Self {
            db,
            password_service,
        }
    }

    /// Upsert the super admin account.
    ///
    /// `_id` and `createdAt` are set only on first insert; everything
    /// else tracks the configured identity across restarts.
    pub async fn seed_super_admin(&self, identity: &BootstrapIdentity) -> Result<()> {
        let email = identity.email.trim().to_lowercase();
        let password_hash = self.password_service.hash_password(&identity.password)?;
        let now = bson::DateTime::from_chrono(Utc::now());

        let collection = self.db.collection::<Document>("admins");
        let result = collection
            .update_one(
                doc! { "email": &email },
                doc! {
                    "$set": {
                        "firstname": &identity.firstname,
                        "lastname": &identity.lastname,
                        "email": &email,
                        "password": password_hash,
                        "role": "SUPER_ADMIN",
                        "status": "ACTIVE",
                        "updatedAt": now,
                    },
                    "$setOnInsert": {
                        "_id": ObjectId::new().to_hex(),
                        "createdAt": now,
                    },
                },
            )
            .upsert(true)
            .await?;

        if result.upserted_id.is_some() {
            info!(email = %email, "Seeded bootstrap super admin");
        } else {
            info!(email = %email, "Refreshed bootstrap super admin");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identity() {
        let identity = BootstrapIdentity::default();
        assert_eq!(identity.email, "admin@adolla.store");
        assert_eq!(identity.firstname, "Super");
    }
}
