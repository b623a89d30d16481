//! Product use cases

pub mod create;
pub mod update;
pub mod delete;

pub use create::{CreateProductCommand, CreateProductUseCase};
pub use update::{UpdateProductCommand, UpdateProductUseCase};
pub use delete::DeleteProductUseCase;
