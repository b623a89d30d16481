//! Storefront customer principal: entity, repository, self-service API.

pub mod entity;
pub mod repository;
pub mod api;
