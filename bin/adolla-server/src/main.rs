//! Adolla Store Server
//!
//! HTTP server for the store platform:
//! - Auth APIs: customer and admin login
//! - Admin APIs: admin creation, activity trail
//! - Product APIs: products and categories
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ADOLLA_PORT` | `60061` | HTTP API port |
//! | `ADOLLA_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `ADOLLA_MONGO_DB` | `adolla-store` | MongoDB database name |
//! | `ADOLLA_JWT_SECRET` | `my-super-secure-jwt-secret` | HS256 signing secret |
//! | `ADOLLA_JWT_EXPIRY_SECS` | `3600` | Access token lifetime |
//! | `ADOLLA_BOOTSTRAP_PASSWORD` | `P@ssw0rd` | Seeded super admin password |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{http::Method, response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use adolla_store::admin::api::{admins_router, AdminsState};
use adolla_store::admin::operations::CreateAdminUseCase;
use adolla_store::admin::repository::AdminRepository;
use adolla_store::audit::repository::ActivityRecordRepository;
use adolla_store::auth::api::{auth_router, AuthState};
use adolla_store::category::operations::CreateCategoryUseCase;
use adolla_store::category::repository::CategoryRepository;
use adolla_store::product::api::{products_router, ProductsState};
use adolla_store::product::operations::{
    CreateProductUseCase, DeleteProductUseCase, UpdateProductUseCase,
};
use adolla_store::product::repository::ProductRepository;
use adolla_store::seed::bootstrap::{BootstrapIdentity, BootstrapSeeder};
use adolla_store::user::api::{users_router, UsersState};
use adolla_store::user::repository::UserRepository;
use adolla_store::{
    Argon2Config, AuthConfig, AuthService, GatewayLayer, GatewayState, MongoUnitOfWork,
    PasswordPolicy, PasswordService, RouteTable,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Every route the server exposes, with its access policy.
/// Routes without an entry default to "authenticated, any kind".
fn route_table() -> RouteTable {
    let mut table = RouteTable::new();

    table.public(Method::POST, "/api/v1/auth/login");
    table.public(Method::POST, "/api/v1/auth/admin-login");
    table.public(Method::POST, "/api/v1/users/signup");
    table.public(Method::GET, "/health");

    // change-password and profile take the default policy: any
    // authenticated principal

    table.admin_only(Method::POST, "/api/v1/admin");
    table.admin_only(Method::GET, "/api/v1/admin/:admin_id/activity-trail");
    table.admin_only(Method::POST, "/api/v1/products");
    table.admin_only(Method::PATCH, "/api/v1/products/:product_id");
    table.admin_only(Method::DELETE, "/api/v1/products/:product_id");
    table.admin_only(Method::POST, "/api/v1/products/category");

    table.public_prefix("/swagger-ui");
    table.public_prefix("/q/openapi");

    table
}

#[tokio::main]
async fn main() -> Result<()> {
    adolla_common::logging::init_logging("adolla-server");

    info!("Starting Adolla Store Server");

    // Configuration from environment
    let port: u16 = env_or_parse("ADOLLA_PORT", 60061);
    let mongo_url = env_or("ADOLLA_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("ADOLLA_MONGO_DB", "adolla-store");
    let jwt_secret = env_or("ADOLLA_JWT_SECRET", "my-super-secure-jwt-secret");
    let jwt_expiry_secs: i64 = env_or_parse("ADOLLA_JWT_EXPIRY_SECS", 3600);
    let bootstrap_password = env_or("ADOLLA_BOOTSTRAP_PASSWORD", "P@ssw0rd");

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Services
    let auth_service = Arc::new(AuthService::new(AuthConfig {
        secret_key: jwt_secret,
        token_expiry_secs: jwt_expiry_secs,
    }));
    let password_service = Arc::new(PasswordService::new(
        Argon2Config::default(),
        PasswordPolicy::default(),
    ));

    // Seed the super admin account (idempotent)
    let seeder = BootstrapSeeder::new(db.clone(), password_service.clone());
    let identity = BootstrapIdentity {
        password: bootstrap_password,
        ..BootstrapIdentity::default()
    };
    seeder.seed_super_admin(&identity).await?;

    // Repositories
    let admin_repo = Arc::new(AdminRepository::new(&db));
    let user_repo = Arc::new(UserRepository::new(&db));
    let product_repo = Arc::new(ProductRepository::new(&db));
    let category_repo = Arc::new(CategoryRepository::new(&db));
    let activity_repo = Arc::new(ActivityRecordRepository::new(&db));
    info!("Repositories initialized");

    // Unit of work and use cases
    let unit_of_work = Arc::new(MongoUnitOfWork::new(mongo_client.clone(), db.clone()));
    let create_admin_use_case = Arc::new(CreateAdminUseCase::new(
        admin_repo.clone(),
        password_service.clone(),
        unit_of_work.clone(),
    ));
    let create_product_use_case = Arc::new(CreateProductUseCase::new(
        category_repo.clone(),
        unit_of_work.clone(),
    ));
    let update_product_use_case = Arc::new(UpdateProductUseCase::new(
        product_repo.clone(),
        category_repo.clone(),
        unit_of_work.clone(),
    ));
    let delete_product_use_case = Arc::new(DeleteProductUseCase::new(
        product_repo.clone(),
        unit_of_work.clone(),
    ));
    let create_category_use_case = Arc::new(CreateCategoryUseCase::new(
        category_repo.clone(),
        unit_of_work.clone(),
    ));

    // API state
    let auth_state = AuthState {
        admin_repo: admin_repo.clone(),
        user_repo: user_repo.clone(),
        auth_service: auth_service.clone(),
        password_service: password_service.clone(),
    };
    let users_state = UsersState {
        user_repo: user_repo.clone(),
        password_service: password_service.clone(),
    };
    let admins_state = AdminsState {
        admin_repo: admin_repo.clone(),
        activity_repo,
        create_use_case: create_admin_use_case,
    };
    let products_state = ProductsState {
        create_use_case: create_product_use_case,
        update_use_case: update_product_use_case,
        delete_use_case: delete_product_use_case,
        create_category_use_case,
    };

    let gateway_state = GatewayState {
        auth_service,
        admin_repo,
        user_repo,
        routes: Arc::new(route_table()),
    };

    // Build API router with auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/v1/auth", auth_router(auth_state))
        .nest("/api/v1/users", users_router(users_state))
        .nest("/api/v1/admin", admins_router(admins_state))
        .nest("/api/v1/products", products_router(products_state))
        .split_for_parts();

    // Register the bearer scheme referenced by the per-route security requirements
    use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    openapi.info.title = "Adolla Store API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description =
        Some("Admin identities, product catalog and activity trail".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(GatewayLayer::new(gateway_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = format!("0.0.0.0:{}", port);
    info!("API server listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Adolla Store Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
