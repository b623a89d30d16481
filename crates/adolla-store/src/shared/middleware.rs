//! Auth Gateway
//!
//! Bearer-token authentication and authorization middleware for Axum.
//! Route capability is an explicit static table resolved at startup; the
//! gateway runs as a tower layer over the router and decides per request
//! whether the caller may proceed. The referenced principal is looked up
//! fresh on every request, so revocation takes effect immediately.

use axum::{
    async_trait,
    extract::{FromRequestParts, MatchedPath},
    http::{header::AUTHORIZATION, request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::admin::entity::AdminRole;
use crate::admin::repository::AdminRepository;
use crate::auth::auth_service::{extract_bearer_token, AuthService, PrincipalKind};
use crate::shared::api_common::ApiError;
use crate::shared::error::{Result, StoreError};
use crate::user::repository::UserRepository;

/// Access policy for one route template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    /// No token required
    pub public: bool,
    /// Requires an Admin principal
    pub admin_only: bool,
}

impl RoutePolicy {
    /// Default for routes without an explicit entry: any authenticated principal.
    pub const AUTHENTICATED: RoutePolicy = RoutePolicy {
        public: false,
        admin_only: false,
    };

    pub const PUBLIC: RoutePolicy = RoutePolicy {
        public: true,
        admin_only: false,
    };

    pub const ADMIN_ONLY: RoutePolicy = RoutePolicy {
        public: false,
        admin_only: true,
    };
}

/// Static `(method, route template) -> RoutePolicy` table.
///
/// Templates use the router's matched-path syntax (`/api/v1/products/:product_id`).
/// Absence of an entry means "authenticated, any kind".
#[derive(Debug, Default)]
pub struct RouteTable {
    policies: HashMap<(Method, String), RoutePolicy>,
    public_prefixes: Vec<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(&mut self, method: Method, template: impl Into<String>) -> &mut Self {
        self.policies.insert((method, template.into()), RoutePolicy::PUBLIC);
        self
    }

    pub fn admin_only(&mut self, method: Method, template: impl Into<String>) -> &mut Self {
        self.policies.insert((method, template.into()), RoutePolicy::ADMIN_ONLY);
        self
    }

    pub fn authenticated(&mut self, method: Method, template: impl Into<String>) -> &mut Self {
        self.policies.insert((method, template.into()), RoutePolicy::AUTHENTICATED);
        self
    }

    /// Mark a whole path prefix public (Swagger UI assets and the like).
    pub fn public_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.public_prefixes.push(prefix.into());
        self
    }

    pub fn policy_for(&self, method: &Method, template: &str) -> RoutePolicy {
        if let Some(policy) = self.policies.get(&(method.clone(), template.to_string())) {
            return *policy;
        }
        if self.public_prefixes.iter().any(|p| template.starts_with(p.as_str())) {
            return RoutePolicy::PUBLIC;
        }
        RoutePolicy::AUTHENTICATED
    }
}

/// The principal resolved for the current request.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal {
    pub id: String,
    pub email: String,
    pub kind: PrincipalKind,
    /// Set only for Admin principals
    pub role: Option<AdminRole>,
}

/// Shared state for the auth gateway.
#[derive(Clone)]
pub struct GatewayState {
    pub auth_service: Arc<AuthService>,
    pub admin_repo: Arc<AdminRepository>,
    pub user_repo: Arc<UserRepository>,
    pub routes: Arc<RouteTable>,
}

/// Reject the request unless the principal kind satisfies the policy.
fn enforce_kind(policy: RoutePolicy, kind: PrincipalKind) -> Result<()> {
    if policy.admin_only && kind != PrincipalKind::Admin {
        return Err(StoreError::forbidden("Admin access required"));
    }
    Ok(())
}

impl GatewayState {
    /// Run the per-request decision chain.
    ///
    /// 1. public route -> pass through without a principal
    /// 2. no bearer token -> 401
    /// 3. token verification failure -> 401
    /// 4. fresh principal lookup by (sub, kind), Active only -> 401 when absent
    /// 5. admin-only route with a Client principal -> 403
    pub async fn authorize(
        &self,
        policy: RoutePolicy,
        bearer: Option<&str>,
    ) -> Result<Option<CurrentPrincipal>> {
        if policy.public {
            return Ok(None);
        }

        let token = bearer
            .ok_or_else(|| StoreError::unauthorized("Missing bearer token"))?;
        let claims = self.auth_service.verify_token(token)?;

        let principal = match claims.kind {
            PrincipalKind::Admin => {
                let admin = self
                    .admin_repo
                    .find_active_by_id(&claims.sub)
                    .await?
                    .ok_or_else(|| {
                        StoreError::principal_unavailable("Admin account is missing or inactive")
                    })?;
                CurrentPrincipal {
                    id: admin.id,
                    email: admin.email,
                    kind: PrincipalKind::Admin,
                    role: Some(admin.role),
                }
            }
            PrincipalKind::Client => {
                let user = self
                    .user_repo
                    .find_active_by_id(&claims.sub)
                    .await?
                    .ok_or_else(|| {
                        StoreError::principal_unavailable("User account is missing or inactive")
                    })?;
                CurrentPrincipal {
                    id: user.id,
                    email: user.email,
                    kind: PrincipalKind::Client,
                    role: None,
                }
            }
        };

        enforce_kind(policy, principal.kind)?;
        Ok(Some(principal))
    }
}

/// Authenticated principal extractor.
/// Reads the `CurrentPrincipal` attached by the gateway layer.
pub struct Authenticated(pub CurrentPrincipal);

impl std::ops::Deref for Authenticated {
    type Target = CurrentPrincipal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Error response for authentication failures
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiError {
            error: "UNAUTHORIZED".to_string(),
            message: self.message,
            details: None,
        };
        (self.status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentPrincipal>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AuthError {
                status: StatusCode::UNAUTHORIZED,
                message: "Missing authentication context".to_string(),
            })
    }
}

/// Middleware layer running the gateway decision ahead of every handler.
use tower::Layer;
use tower::Service;
use std::task::{Context, Poll};
use std::future::Future;
use std::pin::Pin;

#[derive(Clone)]
pub struct GatewayLayer {
    state: GatewayState,
}

impl GatewayLayer {
    pub fn new(state: GatewayState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for GatewayLayer {
    type Service = GatewayMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GatewayMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GatewayMiddleware<S> {
    inner: S,
    state: GatewayState,
}

impl<S, B> Service<axum::http::Request<B>> for GatewayMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        // Take the ready service; leave a clone behind for the next call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let state = self.state.clone();

        Box::pin(async move {
            let method = req.method().clone();
            let template = req
                .extensions()
                .get::<MatchedPath>()
                .map(|m| m.as_str().to_string());

            // No matched route: let the router produce its 404
            let Some(template) = template else {
                return inner.call(req).await;
            };

            let policy = state.routes.policy_for(&method, &template);
            let bearer = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(extract_bearer_token)
                .map(String::from);

            match state.authorize(policy, bearer.as_deref()).await {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                    inner.call(req).await
                }
                Ok(None) => inner.call(req).await,
                Err(e) => {
                    warn!(route = %template, method = %method, reason = %e, "Request denied by auth gateway");
                    Ok(e.into_response())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::auth_service::{AuthConfig, AuthService};
    use chrono::Utc;

    fn sample_table() -> RouteTable {
        let mut table = RouteTable::new();
        table.public(Method::POST, "/api/v1/auth/login");
        table.public(Method::GET, "/health");
        table.admin_only(Method::POST, "/api/v1/products");
        table.admin_only(Method::PATCH, "/api/v1/products/:product_id");
        table.public_prefix("/swagger-ui");
        table
    }

    #[test]
    fn test_policy_lookup_explicit_entries() {
        let table = sample_table();
        assert_eq!(
            table.policy_for(&Method::POST, "/api/v1/auth/login"),
            RoutePolicy::PUBLIC
        );
        assert_eq!(
            table.policy_for(&Method::PATCH, "/api/v1/products/:product_id"),
            RoutePolicy::ADMIN_ONLY
        );
    }

    #[test]
    fn test_policy_lookup_defaults_to_authenticated() {
        let table = sample_table();
        // Same path, different method: no entry, so default applies
        assert_eq!(
            table.policy_for(&Method::GET, "/api/v1/products"),
            RoutePolicy::AUTHENTICATED
        );
        assert_eq!(
            table.policy_for(&Method::GET, "/api/v1/unknown"),
            RoutePolicy::AUTHENTICATED
        );
    }

    #[test]
    fn test_policy_lookup_public_prefix() {
        let table = sample_table();
        assert_eq!(
            table.policy_for(&Method::GET, "/swagger-ui/index.html"),
            RoutePolicy::PUBLIC
        );
    }

    #[test]
    fn test_enforce_kind() {
        assert!(enforce_kind(RoutePolicy::ADMIN_ONLY, PrincipalKind::Admin).is_ok());
        assert!(enforce_kind(RoutePolicy::AUTHENTICATED, PrincipalKind::Client).is_ok());

        let err = enforce_kind(RoutePolicy::ADMIN_ONLY, PrincipalKind::Client).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden { .. }));
    }

    async fn offline_state(table: RouteTable) -> GatewayState {
        // The driver connects lazily, so building repositories needs no server.
        // Only decision paths that never reach the database are exercised here.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let db = client.database("gateway-tests");
        GatewayState {
            auth_service: Arc::new(AuthService::new(AuthConfig::default())),
            admin_repo: Arc::new(AdminRepository::new(&db)),
            user_repo: Arc::new(UserRepository::new(&db)),
            routes: Arc::new(table),
        }
    }

    #[tokio::test]
    async fn test_authorize_public_route_without_token() {
        let state = offline_state(sample_table()).await;
        let result = state.authorize(RoutePolicy::PUBLIC, None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authorize_missing_token() {
        let state = offline_state(sample_table()).await;
        let err = state
            .authorize(RoutePolicy::AUTHENTICATED, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authorize_garbage_token() {
        let state = offline_state(sample_table()).await;
        let err = state
            .authorize(RoutePolicy::AUTHENTICATED, Some("not-a-jwt"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_authorize_expired_token() {
        let state = offline_state(sample_table()).await;

        // Hand-build a token whose exp is well past the validation leeway
        let claims = crate::auth::auth_service::TokenClaims {
            sub: "admin-1".to_string(),
            kind: PrincipalKind::Admin,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(
                AuthConfig::default().secret_key.as_bytes(),
            ),
        )
        .unwrap();

        let err = state
            .authorize(RoutePolicy::AUTHENTICATED, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TokenExpired));
    }
}
