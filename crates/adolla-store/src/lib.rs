//! Adolla Store Platform
//!
//! Authenticated backend for admin identities and the product catalog.
//! Two pieces carry most of the weight:
//!
//! - An auth gateway ([`shared::middleware`]) that resolves a bearer
//!   token to a fresh principal on every request and enforces a static
//!   per-route policy table.
//! - A unit of work ([`usecase`]) that commits every administrative
//!   mutation together with its activity record in one MongoDB
//!   transaction, so the trail can never drift from the data.
//!
//! Aggregates (admin, user, product, category) each own their entity,
//! repository, operations and API surface.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod category;
pub mod product;
pub mod seed;
pub mod shared;
pub mod usecase;
pub mod user;

pub use shared::error::{Result, StoreError};
pub use usecase::{ExecutionContext, MongoUnitOfWork, UnitOfWork, UseCaseError, UseCaseResult};

pub use admin::entity::{Admin, AdminRole, AdminStatus};
pub use audit::entity::{ActivityAction, ActivityRecord};
pub use auth::auth_service::{AuthConfig, AuthService, PrincipalKind};
pub use auth::password_service::{Argon2Config, PasswordPolicy, PasswordService};
pub use category::entity::ProductCategory;
pub use product::entity::{Currency, Price, Product, ProductStatus};
pub use shared::middleware::{
    Authenticated, CurrentPrincipal, GatewayLayer, GatewayState, RoutePolicy, RouteTable,
};
pub use user::entity::{User, UserStatus};
