//! Error type definitions for the TFT data API
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.

use std::fmt;

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can reach the web layer.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Image asset lookups
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Underlying database failures
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// SQL query execution failures
    #[error("Query failed: {query} - {message}")]
    QueryFailed { query: String, message: String },

    /// Data serialization/deserialization failures
    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Constraint violations (unique, foreign key, etc.)
    #[error("Constraint violation: {constraint} - {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// Record not found
    #[error("Record not found: {table} with {field} = {value}")]
    RecordNotFound {
        table: String,
        field: String,
        value: String,
    },
}

/// Why an asset lookup produced no file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetNotFoundReason {
    /// The requested asset type is not one of the known directories
    InvalidType,
    /// The type is known but no file backs the normalized key
    AssetMissing,
}

impl fmt::Display for AssetNotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidType => f.write_str("invalid asset type"),
            Self::AssetMissing => f.write_str("asset missing"),
        }
    }
}

/// Asset resolution errors
///
/// The resolver reports exactly one failure kind. `normalized_key` is the
/// key after normalization, never the raw input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found ({reason}): {asset_type}/{normalized_key}")]
    NotFound {
        reason: AssetNotFoundReason,
        asset_type: String,
        normalized_key: String,
    },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

impl RepositoryError {
    /// Create a query failed error
    pub fn query_failed<Q: Into<String>, M: Into<String>>(query: Q, message: M) -> Self {
        Self::QueryFailed {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a record not found error
    pub fn record_not_found<T: Into<String>, F: Into<String>, V: Into<String>>(
        table: T,
        field: F,
        value: V,
    ) -> Self {
        Self::RecordNotFound {
            table: table.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation<C: Into<String>, M: Into<String>>(
        constraint: C,
        message: M,
    ) -> Self {
        Self::ConstraintViolation {
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Map a write failure, recognising unique violations
    pub fn from_write(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return Self::constraint_violation("unique", db_error.message().to_string());
            }
        }
        Self::Database(error)
    }
}

impl AssetError {
    pub fn invalid_type<T: Into<String>, K: Into<String>>(asset_type: T, normalized_key: K) -> Self {
        Self::NotFound {
            reason: AssetNotFoundReason::InvalidType,
            asset_type: asset_type.into(),
            normalized_key: normalized_key.into(),
        }
    }

    pub fn missing<T: Into<String>, K: Into<String>>(asset_type: T, normalized_key: K) -> Self {
        Self::NotFound {
            reason: AssetNotFoundReason::AssetMissing,
            asset_type: asset_type.into(),
            normalized_key: normalized_key.into(),
        }
    }

    pub fn reason(&self) -> AssetNotFoundReason {
        match self {
            Self::NotFound { reason, .. } => *reason,
        }
    }
}
