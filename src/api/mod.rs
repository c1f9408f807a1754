//! API Module
//!
//! HTTP handlers and routing for the exploration API.
//!
//! # Endpoints
//! - `POST /get` - Resolve a key into its artifact
//! - `GET /keys` - List cached keys
//! - `POST /select` - Narrow the space by value sets or ranges
//! - `POST /sample` - Resolve an evenly spaced grid
//! - `GET /snapshot` - Dump every cached artifact
//! - `GET /dimensions` - Describe the declared dimensions
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
