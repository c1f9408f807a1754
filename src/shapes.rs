//! Demonstration Shapes
//!
//! Regular polygons keyed by side count and radius, the space served by the
//! `paramap` binary.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::error::{MapError, Result};
use crate::map::{Generator, ParametricMap};
use crate::space::{Dimension, Key};

/// Side counts offered by the demonstration map
pub const SIDES: std::ops::RangeInclusive<u32> = 2..=10;

/// Radius range offered by the demonstration map
pub const RADIUS_RANGE: (f64, f64) = (0.5, 1.0);

// == Polygon ==
/// A closed regular polygon path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub sides: u32,
    pub radius: f64,
    /// `sides + 1` points, the last repeating the first
    pub vertices: Vec<[f64; 2]>,
}

/// Builds a regular polygon centred on the origin with its first vertex at the top.
pub fn polygon(sides: u32, radius: f64) -> Polygon {
    let vertices = (0..=sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            [radius * angle.sin(), radius * angle.cos()]
        })
        .collect();

    Polygon {
        sides,
        radius,
        vertices,
    }
}

fn polygon_for(key: &Key) -> Result<serde_json::Value> {
    let sides = key
        .get(0)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| MapError::Generator(format!("no side count in key {}", key)))?;
    let radius = key
        .get(1)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| MapError::Generator(format!("no radius in key {}", key)))?;

    serde_json::to_value(polygon(sides as u32, radius))
        .map_err(|e| MapError::Generator(e.to_string()))
}

// == Shape Map ==
/// Declares `N` (side count) and `radius` and resolves keys into polygon JSON.
pub fn shape_map(capacity: usize) -> Result<ParametricMap<serde_json::Value>> {
    ParametricMap::new(
        vec![
            Dimension::values("N", SIDES)?,
            Dimension::range("radius", RADIUS_RANGE.0, RADIUS_RANGE.1)?,
        ],
        Generator::try_function(polygon_for),
    )?
    .with_capacity(capacity)
}
