//! Shared types for the print-shop storefront
//!
//! Common types used by the storefront server and its API clients:
//! error system, i18n, data models, pagination and small utilities.

pub mod error;
pub mod i18n;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorCode, ErrorResponse};
pub use i18n::{Lang, LocalizedText, Translation, pick_translation};
pub use pagination::{PageQuery, PaginatedResponse};
