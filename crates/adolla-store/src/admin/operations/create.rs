//! Create Admin Use Case

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::admin::entity::{Admin, AdminRole};
use crate::admin::repository::AdminRepository;
use crate::audit::entity::{ActivityAction, ActivityRecord};
use crate::auth::password_service::PasswordService;
use crate::details;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Email validation pattern
fn email_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

/// Command for creating a new admin account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminCommand {
    pub firstname: String,

    pub lastname: String,

    /// Must be unique across admins
    pub email: String,

    /// Raw password; hashed before anything is stored, and never
    /// serialized into the activity snapshot
    #[serde(skip_serializing)]
    pub password: String,

    /// Defaults to ADMIN when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
}

/// Use case for creating a new admin.
pub struct CreateAdminUseCase<U: UnitOfWork> {
    admin_repo: Arc<AdminRepository>,
    password_service: Arc<PasswordService>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateAdminUseCase<U> {
    pub fn new(
        admin_repo: Arc<AdminRepository>,
        password_service: Arc<PasswordService>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            admin_repo,
            password_service,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateAdminCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ActivityRecord> {
        // Validation: email is required and must be valid
        let email = command.email.trim().to_lowercase();
        if email.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "EMAIL_REQUIRED",
                "Email address is required",
            ));
        }
        if !email_pattern().is_match(&email) {
            return UseCaseResult::failure(UseCaseError::validation_with_details(
                "INVALID_EMAIL_FORMAT",
                "Invalid email address format",
                details! { "email" => &command.email },
            ));
        }

        if command.firstname.trim().is_empty() || command.lastname.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Firstname and lastname are required",
            ));
        }

        // Validation: password must satisfy the policy before any lookup
        if let Err(e) = self.password_service.validate_password(&command.password) {
            return UseCaseResult::failure(UseCaseError::validation(
                "INVALID_PASSWORD",
                e.to_string(),
            ));
        }

        // Business rule: email must be unique. A lookup failure must not
        // pass as "unique", so the error propagates instead of committing.
        match self.admin_repo.find_by_email(&email).await {
            Ok(Some(_)) => {
                return UseCaseResult::failure(UseCaseError::business_rule_with_details(
                    "EMAIL_EXISTS",
                    format!("An admin with email '{}' already exists", email),
                    details! { "email" => &email },
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "500:-DBError:-Failed to check email uniqueness: {}",
                    e
                )));
            }
        }

        let password_hash = match self.password_service.hash_password(&command.password) {
            Ok(h) => h,
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "500:-HashingError:-Failed to hash password: {}",
                    e
                )))
            }
        };

        let admin = Admin::new(
            command.firstname.trim(),
            command.lastname.trim(),
            &email,
            password_hash,
            command.role.unwrap_or_default(),
        );

        let activity = ActivityRecord::new(
            &ctx.admin_id,
            ActivityAction::AddAdmin,
            format!("Created admin user with email: {}.", email),
        )
        .with_admin(&admin.id)
        .with_snapshot(&command);

        // Atomic commit
        self.unit_of_work.commit(&admin, activity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password_service::{Argon2Config, PasswordPolicy};
    use crate::usecase::unit_of_work::{FailingUnitOfWork, InMemoryUnitOfWork};

    fn test_password_service() -> Arc<PasswordService> {
        Arc::new(PasswordService::new(
            Argon2Config::testing(),
            PasswordPolicy::lenient(),
        ))
    }

    async fn offline_repo() -> Arc<AdminRepository> {
        // Lazy driver: building the repository needs no running server
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        Arc::new(AdminRepository::new(&client.database("usecase-tests")))
    }

    async fn unreachable_repo() -> Arc<AdminRepository> {
        // Port 1 refuses connections, so every lookup errors quickly
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500",
        )
        .await
        .unwrap();
        Arc::new(AdminRepository::new(&client.database("usecase-tests")))
    }

    fn command(email: &str, password: &str) -> CreateAdminCommand {
        CreateAdminCommand {
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let use_case = CreateAdminUseCase::new(
            offline_repo().await,
            test_password_service(),
            Arc::new(InMemoryUnitOfWork::new()),
        );

        let result = use_case
            .execute(command("  ", "longenoughpass"), ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().code(), "EMAIL_REQUIRED");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let use_case = CreateAdminUseCase::new(
            offline_repo().await,
            test_password_service(),
            Arc::new(InMemoryUnitOfWork::new()),
        );

        let result = use_case
            .execute(command("not-an-email", "longenoughpass"), ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().code(), "INVALID_EMAIL_FORMAT");
    }

    #[tokio::test]
    async fn test_weak_password_rejected_before_any_write() {
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let use_case =
            CreateAdminUseCase::new(offline_repo().await, test_password_service(), uow.clone());

        let result = use_case
            .execute(command("jane@example.com", "short"), ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().code(), "INVALID_PASSWORD");
        assert_eq!(uow.committed_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_failing_commit() {
        // A failing unit of work is never reached when validation rejects first
        let use_case = CreateAdminUseCase::new(
            offline_repo().await,
            test_password_service(),
            Arc::new(FailingUnitOfWork),
        );

        let result = use_case
            .execute(command("", "longenoughpass"), ExecutionContext::create("admin-0"))
            .await;
        assert_eq!(result.unwrap_err().http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_db_error_during_uniqueness_check_blocks_commit() {
        // A failed duplicate lookup must surface as a 500, never commit
        let uow = Arc::new(InMemoryUnitOfWork::new());
        let use_case =
            CreateAdminUseCase::new(unreachable_repo().await, test_password_service(), uow.clone());

        let result = use_case
            .execute(
                command("jane@example.com", "longenoughpass"),
                ExecutionContext::create("admin-0"),
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), "COMMIT_FAILED");
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(uow.committed_count(), 0);
    }

    #[test]
    fn test_password_never_serialized_into_snapshot() {
        let cmd = command("jane@example.com", "supersecret");
        let json = serde_json::to_value(&cmd).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "jane@example.com");
    }

    #[test]
    fn test_email_pattern() {
        assert!(email_pattern().is_match("admin@adolla.store"));
        assert!(email_pattern().is_match("user+tag@example.co.uk"));
        assert!(!email_pattern().is_match("invalid"));
        assert!(!email_pattern().is_match("@example.com"));
    }
}
