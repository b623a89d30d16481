//! Shared infrastructure: error types, API common types, auth gateway.

pub mod error;
pub mod api_common;
pub mod middleware;
