//! Selection Module
//!
//! Declarative sub-selection of a parameter space by value sets or ranges.

use std::fmt;

use serde::Deserialize;

use crate::space::Value;

// == Dimension Reference ==
/// Refers to a dimension by name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DimRef {
    Index(usize),
    Name(String),
}

impl From<&str> for DimRef {
    fn from(name: &str) -> Self {
        DimRef::Name(name.to_string())
    }
}

impl From<String> for DimRef {
    fn from(name: String) -> Self {
        DimRef::Name(name)
    }
}

impl From<usize> for DimRef {
    fn from(index: usize) -> Self {
        DimRef::Index(index)
    }
}

impl fmt::Display for DimRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimRef::Index(i) => write!(f, "#{}", i),
            DimRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

// == Constraint ==
/// A restriction placed on one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Discrete set of values
    Values(Vec<Value>),
    /// Numeric range `[min, max]`, validated when the selection is applied
    Range { min: f64, max: f64 },
}

impl Constraint {
    pub fn is_range(&self) -> bool {
        matches!(self, Constraint::Range { .. })
    }
}

// == Selection ==
/// An ordered collection of per-dimension constraints.
///
/// ```
/// use paramap::space::Selection;
/// let selection = Selection::new()
///     .values("N", [2, 3])
///     .values("radius", [0.7, 0.8]);
/// assert_eq!(selection.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    constraints: Vec<(DimRef, Constraint)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `dimension` to a discrete set of values.
    pub fn values<I, V>(mut self, dimension: impl Into<DimRef>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.constraints
            .push((dimension.into(), Constraint::Values(values)));
        self
    }

    /// Restricts `dimension` to the numeric range `[min, max]`.
    pub fn range(mut self, dimension: impl Into<DimRef>, min: f64, max: f64) -> Self {
        self.constraints
            .push((dimension.into(), Constraint::Range { min, max }));
        self
    }

    /// Adds an already-built constraint.
    pub fn with(mut self, dimension: impl Into<DimRef>, constraint: Constraint) -> Self {
        self.constraints.push((dimension.into(), constraint));
        self
    }

    pub fn constraints(&self) -> &[(DimRef, Constraint)] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
