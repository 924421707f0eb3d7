//! Centralized error handling for the TFT data API
//!
//! Errors are grouped by layer so that each layer only deals with the
//! failures it can produce, and converted into [`AppError`] at the web
//! boundary where they are mapped to HTTP status codes.
//!
//! # Error Categories
//!
//! - **Repository Errors**: SQLite failures, constraint violations, missing rows
//! - **Asset Errors**: Image lookups that did not resolve to a file
//! - **Validation Errors**: Input validation and business rule violations
//!
//! # Usage
//!
//! ```rust
//! use tft_data_api::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for asset resolution Results
pub type AssetResult<T> = Result<T, AssetError>;
