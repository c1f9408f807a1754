//! Error types for the parameter map
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Map Error Enum ==
/// Unified error type for the parameter map and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// Key component falls outside a bounded dimension
    #[error("Value {value} is outside the bounds of dimension '{dimension}'")]
    Domain { dimension: String, value: String },

    /// Selection constraint is invalid or incompatible
    #[error("Invalid constraint: {0}")]
    Constraint(String),

    /// Key length does not match the number of dimensions
    #[error("Key has {actual} values but the map declares {expected} dimensions")]
    Arity { expected: usize, actual: usize },

    /// Operation requires bounds on a dimension that has none
    #[error("Dimension '{0}' is open and cannot be enumerated")]
    OpenDimension(String),

    /// Dimension declaration is malformed
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// Map configuration is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sequence source has no more artifacts
    #[error("Sequence source is exhausted")]
    Exhausted,

    /// Generator failed to produce an artifact
    #[error("Generator failed: {0}")]
    Generator(String),

    /// Stream parameter is unknown, clashes on rename, or is missing for a dimension
    #[error("Stream parameter error: {0}")]
    StreamParameter(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal invariant violated
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for MapError {
    fn into_response(self) -> Response {
        let status = match &self {
            MapError::Domain { .. }
            | MapError::Constraint(_)
            | MapError::Arity { .. }
            | MapError::OpenDimension(_)
            | MapError::StreamParameter(_)
            | MapError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            MapError::Exhausted => StatusCode::GONE,
            MapError::InvalidDimension(_)
            | MapError::InvalidConfig(_)
            | MapError::Generator(_)
            | MapError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the parameter map.
pub type Result<T> = std::result::Result<T, MapError>;
