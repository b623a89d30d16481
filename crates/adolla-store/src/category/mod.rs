//! Product category aggregate.

pub mod entity;
pub mod repository;
pub mod operations;
