//! Store Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use utoipa::ToSchema;

use crate::usecase::UseCaseError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Principal unavailable: {message}")]
    PrincipalUnavailable { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// Error that crossed a boundary as a `<status>:-<reason>:-<detail>` triplet
    #[error("{reason}: {detail}")]
    Tagged { status: u16, reason: String, detail: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StoreError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn principal_unavailable(message: impl Into<String>) -> Self {
        Self::PrincipalUnavailable { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Parse a `<status>:-<reason>:-<detail>` tagged error message.
///
/// Returns `None` unless the message has exactly three `:-` separated parts
/// and the first is a valid HTTP status code.
pub fn parse_tagged(message: &str) -> Option<(u16, &str, &str)> {
    let mut parts = message.splitn(3, ":-");
    let status: u16 = parts.next()?.parse().ok()?;
    if !(100..=599).contains(&status) {
        return None;
    }
    let reason = parts.next()?;
    let detail = parts.next()?;
    Some((status, reason, detail))
}

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND".to_string()),
            StoreError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE".to_string()),
            StoreError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".to_string()),
            StoreError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED".to_string()),
            StoreError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN".to_string()),
            StoreError::PrincipalUnavailable { .. } => (StatusCode::UNAUTHORIZED, "PRINCIPAL_UNAVAILABLE".to_string()),
            StoreError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED".to_string()),
            StoreError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN".to_string()),
            StoreError::Tagged { status, reason, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                reason.clone(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR".to_string()),
        };

        let body = ErrorResponse {
            error: error_type,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UseCaseError> for StoreError {
    fn from(err: UseCaseError) -> Self {
        // Errors raised inside the unit carry a tagged triplet in their message
        if let Some((status, reason, detail)) = parse_tagged(err.message()) {
            return StoreError::Tagged {
                status,
                reason: reason.to_string(),
                detail: detail.to_string(),
            };
        }

        match err {
            UseCaseError::ValidationError { message, .. } => {
                StoreError::Validation { message }
            }
            UseCaseError::BusinessRuleViolation { message, .. } => {
                StoreError::Duplicate {
                    entity_type: "Entity".to_string(),
                    field: "constraint".to_string(),
                    value: message,
                }
            }
            UseCaseError::NotFoundError { message, .. } => {
                StoreError::NotFound {
                    entity_type: "Entity".to_string(),
                    id: message,
                }
            }
            UseCaseError::CommitError { message, .. } => {
                StoreError::Internal { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_valid() {
        let (status, reason, detail) =
            parse_tagged("500:-ActivityRecordError:-Failed to append activity record: io error")
                .unwrap();
        assert_eq!(status, 500);
        assert_eq!(reason, "ActivityRecordError");
        assert_eq!(detail, "Failed to append activity record: io error");
    }

    #[test]
    fn test_parse_tagged_rejects_plain_messages() {
        assert!(parse_tagged("Product not found").is_none());
        assert!(parse_tagged("abc:-Reason:-detail").is_none());
        assert!(parse_tagged("500:-OnlyTwoParts").is_none());
        assert!(parse_tagged("99:-Reason:-status out of range").is_none());
    }

    #[test]
    fn test_use_case_error_triplet_conversion() {
        let err = UseCaseError::commit("500:-TransactionError:-Failed to commit transaction: timeout");
        let store_err: StoreError = err.into();
        match store_err {
            StoreError::Tagged { status, reason, detail } => {
                assert_eq!(status, 500);
                assert_eq!(reason, "TransactionError");
                assert!(detail.contains("timeout"));
            }
            other => panic!("Expected Tagged, got {:?}", other),
        }
    }

    #[test]
    fn test_use_case_error_plain_conversion() {
        let err = UseCaseError::validation("EMAIL_REQUIRED", "Email address is required");
        let store_err: StoreError = err.into();
        assert!(matches!(store_err, StoreError::Validation { .. }));

        let err = UseCaseError::not_found("PRODUCT_NOT_FOUND", "no such product");
        let store_err: StoreError = err.into();
        assert!(matches!(store_err, StoreError::NotFound { .. }));
    }
}
