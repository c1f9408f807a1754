//! Parametric Map Module
//!
//! The lazily evaluated map and the generators it draws artifacts from.

mod generator;
mod parametric;


pub use generator::{CounterSource, Generator, PureFunction, Resolve, SequenceSource};
pub use parametric::{Mode, ParametricMap};
