//! Request DTOs for the exploration API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::{MapError, Result};
use crate::space::{Constraint, DimRef, Key, Selection, Value};

/// Upper bound on samples per dimension accepted over HTTP
pub const MAX_SAMPLES_PER_DIMENSION: usize = 1000;

/// Upper bound on the values listed in one selection constraint
pub const MAX_VALUES_PER_CONSTRAINT: usize = 1000;

/// Upper bound on the keys a single selection may produce
pub const MAX_SELECTION_KEYS: usize = 5000;

/// Request body for POST /get
#[derive(Debug, Clone, Deserialize)]
pub struct GetRequest {
    /// One value per dimension, in declaration order
    pub key: Key,
}

impl GetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// A single constraint in a POST /select body.
///
/// Exactly one of `values` and `range` must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintRequest {
    /// Dimension name or positional index
    pub dimension: DimRef,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
    #[serde(default)]
    pub range: Option<[f64; 2]>,
}

/// Request body for POST /select
#[derive(Debug, Clone, Deserialize)]
pub struct SelectRequest {
    pub constraints: Vec<ConstraintRequest>,
}

impl SelectRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        self.constraints.iter().find_map(|request| {
            let count = request.values.as_ref().map_or(0, Vec::len);
            (count > MAX_VALUES_PER_CONSTRAINT).then(|| {
                format!(
                    "Constraint on dimension {} lists {} values, maximum is {}",
                    request.dimension, count, MAX_VALUES_PER_CONSTRAINT
                )
            })
        })
    }

    /// Converts the request into a [`Selection`].
    pub fn to_selection(&self) -> Result<Selection> {
        let mut selection = Selection::new();
        for request in &self.constraints {
            let constraint = match (&request.values, &request.range) {
                (Some(values), None) => Constraint::Values(values.clone()),
                (None, Some([min, max])) => Constraint::Range {
                    min: *min,
                    max: *max,
                },
                _ => {
                    return Err(MapError::InvalidRequest(format!(
                        "constraint on dimension {} needs exactly one of 'values' or 'range'",
                        request.dimension
                    )));
                }
            };
            selection = selection.with(request.dimension.clone(), constraint);
        }
        Ok(selection)
    }
}

/// Request body for POST /sample
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRequest {
    /// Points per range dimension
    pub samples: usize,
}

impl SampleRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.samples == 0 {
            return Some("Sample count must be at least 1".to_string());
        }
        if self.samples > MAX_SAMPLES_PER_DIMENSION {
            return Some(format!(
                "Sample count exceeds maximum of {}",
                MAX_SAMPLES_PER_DIMENSION
            ));
        }
        None
    }
}
