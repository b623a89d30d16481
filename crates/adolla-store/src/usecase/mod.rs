//! Use Case Infrastructure
//!
//! Provides the foundational patterns for implementing use cases:
//! - `UseCaseResult<T>` - sealed result type for use case outcomes
//! - `UseCaseError` - categorized error types for consistent handling
//! - `ExecutionContext` - actor context threaded through use case execution
//! - `UnitOfWork` - atomic commit of entity mutation + activity record

pub mod result;
pub mod error;
pub mod execution_context;
pub mod unit_of_work;

pub use result::UseCaseResult;
pub use error::UseCaseError;
pub use execution_context::ExecutionContext;
pub use unit_of_work::{UnitOfWork, MongoUnitOfWork};
