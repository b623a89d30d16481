//! Admin use cases

pub mod create;

pub use create::{CreateAdminCommand, CreateAdminUseCase};
