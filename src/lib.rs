//! paramap - a lazily evaluated parameter-space map
//!
//! Resolves points of a declared parameter space into artifacts on first
//! access, caches them with LRU eviction and supports declarative
//! sub-selection by value sets or ranges.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod map;
pub mod models;
pub mod shapes;
pub mod space;
pub mod stream;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{MapError, Result};
pub use map::{Generator, Mode, ParametricMap, Resolve};
pub use space::{Constraint, DimRef, Dimension, Interval, Key, Selection, Value};
pub use stream::{Contents, Stream, Subscriber};
pub use tasks::spawn_stats_task;
