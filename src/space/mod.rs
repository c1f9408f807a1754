//! Parameter Space Module
//!
//! Values, keys, dimensions and selections describing a parameter space.

mod dimension;
mod selection;
mod value;

pub use dimension::{Bounds, Dimension, Interval};
pub use selection::{Constraint, DimRef, Selection};
pub use value::{Key, Value};
