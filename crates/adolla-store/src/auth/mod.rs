//! Authentication: token authority, password hashing, login endpoints.

pub mod auth_service;
pub mod password_service;
pub mod api;
