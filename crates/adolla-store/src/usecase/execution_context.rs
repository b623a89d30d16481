//! Execution Context
//!
//! Context for a use case execution. Carries the acting admin identity
//! through the execution of a use case, and is the source of the
//! `admin_id` stamped on every activity record.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

/// Context for a use case execution.
///
/// Built at the API boundary from the authenticated principal and passed
/// explicitly into every operation. Nothing in here is ambient state.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the admin performing the action
    pub admin_id: String,
    /// Request-scoped ID used for log correlation
    pub request_id: String,
    /// When the execution was initiated
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a new execution context for a fresh request.
    pub fn create(admin_id: impl Into<String>) -> Self {
        Self {
            admin_id: admin_id.into(),
            request_id: format!("req-{}", ObjectId::new().to_hex()),
            initiated_at: Utc::now(),
        }
    }

    /// Create an execution context with an existing request ID.
    ///
    /// Use this when a correlation ID was supplied by an upstream system.
    pub fn with_request_id(
        admin_id: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            admin_id: admin_id.into(),
            request_id: request_id.into(),
            initiated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_context() {
        let ctx = ExecutionContext::create("admin-123");

        assert_eq!(ctx.admin_id, "admin-123");
        assert!(ctx.request_id.starts_with("req-"));
    }

    #[test]
    fn test_with_request_id() {
        let ctx = ExecutionContext::with_request_id("admin-123", "req-456");

        assert_eq!(ctx.admin_id, "admin-123");
        assert_eq!(ctx.request_id, "req-456");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = ExecutionContext::create("admin-1");
        let b = ExecutionContext::create("admin-1");
        assert_ne!(a.request_id, b.request_id);
    }
}
