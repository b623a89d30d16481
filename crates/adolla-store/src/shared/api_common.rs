//! Common API types and utilities

use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};

mod string_or_number {
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize_u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNum {
            Num(u32),
            Str(String),
        }

        match Option::<StringOrNum>::deserialize(deserializer)? {
            Some(StringOrNum::Num(n)) => Ok(Some(n)),
            Some(StringOrNum::Str(s)) => s.parse().map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Pagination parameters (1-based page_number, limit)
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "snake_case")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "string_or_number::deserialize_u32_opt")]
    page_number: Option<u32>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_u32_opt")]
    limit: Option<u32>,
}

impl PaginationParams {
    /// 1-based page number; zero is clamped to the first page.
    pub fn page_number(&self) -> u32 {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(100)
    }

    pub fn skip(&self) -> u64 {
        (self.limit() as u64) * ((self.page_number() as u64) - 1)
    }

    pub fn limit_i64(&self) -> i64 {
        self.limit() as i64
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_number: Some(1),
            limit: Some(100),
        }
    }
}

/// Pagination metadata echoed alongside the data page
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct PageMeta {
    pub page_number: u32,
    pub limit: u32,
    pub total: u64,
}

/// Paginated response envelope: `{ meta, data }`
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page_number: u32, limit: u32, total: u64) -> Self {
        Self {
            meta: PageMeta {
                page_number,
                limit,
                total,
            },
            data,
        }
    }
}

/// Success response with optional message
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Created response with ID
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
