//! Category use cases

pub mod create;

pub use create::{CreateCategoryCommand, CreateCategoryUseCase};
