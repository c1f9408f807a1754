//! Dimension Module
//!
//! Declares the axes of a parameter space and the bounds placed on them.

use serde::Serialize;

use crate::error::{MapError, Result};
use crate::space::Value;

// == Interval ==
/// A closed numeric interval `[min, max]` with finite endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    // == Constructor ==
    /// Creates an interval, rejecting non-finite or inverted endpoints.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(MapError::InvalidDimension(format!(
                "interval endpoints must be finite, got [{}, {}]",
                min, max
            )));
        }
        if min > max {
            return Err(MapError::InvalidDimension(format!(
                "interval minimum {} exceeds maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns true if `x` lies within the interval (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if `other` lies entirely within this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Returns `count` evenly spaced points from `min` to `max`.
    ///
    /// A single point is `min`.
    pub fn linspace(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = (self.max - self.min) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            self.max
                        } else {
                            self.min + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

// == Bounds ==
/// The constraint declared on a dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Bounds {
    /// No declared bounds; keys are supplied externally
    Open,
    /// Finite numeric range
    Range(Interval),
    /// Finite set of allowed values, in declaration order
    Values(Vec<Value>),
}

// == Dimension ==
/// A named axis of the parameter space.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    bounds: Bounds,
}

impl Dimension {
    /// Declares an open (unbounded) dimension.
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Bounds::Open,
        }
    }

    /// Declares a dimension bounded by the numeric range `[min, max]`.
    pub fn range(name: impl Into<String>, min: f64, max: f64) -> Result<Self> {
        let name = name.into();
        let interval = Interval::new(min, max)
            .map_err(|e| MapError::InvalidDimension(format!("dimension '{}': {}", name, e)))?;
        Ok(Self {
            name,
            bounds: Bounds::Range(interval),
        })
    }

    /// Declares a dimension bounded by a finite set of values.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn values<I, V>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name = name.into();
        let mut unique: Vec<Value> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        if unique.is_empty() {
            return Err(MapError::InvalidDimension(format!(
                "dimension '{}' declares an empty value set",
                name
            )));
        }
        Ok(Self {
            name,
            bounds: Bounds::Values(unique),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns true if the dimension declares a range or value set.
    pub fn is_bounded(&self) -> bool {
        !matches!(self.bounds, Bounds::Open)
    }

    /// Returns the declared value set, if any.
    pub fn declared_values(&self) -> Option<&[Value]> {
        match &self.bounds {
            Bounds::Values(values) => Some(values),
            _ => None,
        }
    }

    // == Admits ==
    /// Checks whether `value` satisfies the declared bounds.
    ///
    /// Open dimensions admit everything.
    pub fn admits(&self, value: &Value) -> bool {
        match &self.bounds {
            Bounds::Open => true,
            Bounds::Range(interval) => value.as_f64().is_some_and(|x| interval.contains(x)),
            Bounds::Values(values) => values.contains(value),
        }
    }

    // == Extent ==
    /// Returns the numeric extent of the declared bounds.
    ///
    /// A range is its own extent; an all-numeric value set spans its minimum
    /// to its maximum. Open and text-valued dimensions have no extent.
    pub fn extent(&self) -> Option<Interval> {
        match &self.bounds {
            Bounds::Open => None,
            Bounds::Range(interval) => Some(*interval),
            Bounds::Values(values) => {
                let numbers: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
                let numbers = numbers?;
                let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
                let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Interval::new(min, max).ok()
            }
        }
    }
}
