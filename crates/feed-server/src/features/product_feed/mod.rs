//! Product feed feature
//!
//! Serves the current catalog as an OpenAI product feed document. Uses the
//! same mapper as the scheduled export.

pub mod queries;
pub mod routes;

pub use routes::product_feed_routes;
