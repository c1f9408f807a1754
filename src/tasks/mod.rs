//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Statistics reporter: logs cache statistics at configured intervals

mod stats_report;

pub use stats_report::spawn_stats_task;
