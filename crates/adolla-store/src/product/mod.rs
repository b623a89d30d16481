//! Product catalog aggregate: entity, repository, operations, API.

pub mod entity;
pub mod repository;
pub mod operations;
pub mod api;
