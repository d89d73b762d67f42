//! Shared API types: errors, JSON extraction, pagination

pub mod error;
pub mod json;
pub mod pagination;
pub mod sanitize;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use pagination::{paginate, PageInfo, PageParams, Paginated};
pub use sanitize::sanitize;
