//! Request and Response models for the exploration API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ConstraintRequest, GetRequest, SampleRequest, SelectRequest, MAX_SAMPLES_PER_DIMENSION,
    MAX_SELECTION_KEYS, MAX_VALUES_PER_CONSTRAINT,
};
pub use responses::{
    DimensionView, DimensionsResponse, EntryView, ErrorResponse, GetResponse, HealthResponse,
    KeysResponse, SampleResponse, SelectResponse, SnapshotResponse, StatsResponse,
};
