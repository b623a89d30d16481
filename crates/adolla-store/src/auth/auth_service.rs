//! Authentication Service
//!
//! JWT token generation and validation (HS256 shared secret).
//! Tokens are stateless; revocation happens solely through principal
//! status, which the gateway re-checks on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::shared::error::{Result, StoreError};

/// Which side of the store a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalKind {
    /// Back-office administrator
    Admin,
    /// Storefront customer
    Client,
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalKind::Admin => write!(f, "ADMIN"),
            PrincipalKind::Client => write!(f, "CLIENT"),
        }
    }
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal ID)
    pub sub: String,

    /// Principal kind (ADMIN or CLIENT)
    #[serde(rename = "type")]
    pub kind: PrincipalKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Configuration for the auth service
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub secret_key: String,

    /// Access token expiration in seconds
    pub token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "my-super-secure-jwt-secret".to_string(),
            token_expiry_secs: 3600, // 1 hour
        }
    }
}

/// Authentication service for token management
pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        info!("AuthService initialized with HS256");

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for a principal
    pub fn sign_token(&self, subject_id: &str, kind: PrincipalKind) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_expiry_secs);

        let claims = TokenClaims {
            sub: subject_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| StoreError::internal(format!("Failed to encode JWT: {}", e)))
    }

    /// Validate an access token and extract claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => StoreError::TokenExpired,
                _ => StoreError::InvalidToken { message: format!("{}", e) },
            })
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_token() {
        let service = AuthService::new(AuthConfig::default());

        let token = service.sign_token("admin-123", PrincipalKind::Admin).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "admin-123");
        assert_eq!(claims.kind, PrincipalKind::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_client_token_kind() {
        let service = AuthService::new(AuthConfig::default());

        let token = service.sign_token("user-7", PrincipalKind::Client).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.kind, PrincipalKind::Client);
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let service = AuthService::new(AuthConfig::default());
        let other = AuthService::new(AuthConfig {
            secret_key: "a-different-secret".to_string(),
            ..AuthConfig::default()
        });

        let token = other.sign_token("admin-123", PrincipalKind::Admin).unwrap();
        let err = service.verify_token(&token).unwrap_err();
        assert!(matches!(err, StoreError::InvalidToken { .. }));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = AuthService::new(AuthConfig::default());

        // exp must be well past the default 60s validation leeway
        let claims = TokenClaims {
            sub: "admin-123".to_string(),
            kind: PrincipalKind::Admin,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(AuthConfig::default().secret_key.as_bytes()),
        )
        .unwrap();

        let err = service.verify_token(&token).unwrap_err();
        assert!(matches!(err, StoreError::TokenExpired));
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(
            serde_json::to_string(&PrincipalKind::Admin).unwrap(),
            "\"ADMIN\""
        );
        assert_eq!(
            serde_json::to_string(&PrincipalKind::Client).unwrap(),
            "\"CLIENT\""
        );
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
