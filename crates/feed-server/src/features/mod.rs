//! Feature modules implementing the HTTP API
//!
//! Each feature is a vertical slice with its own queries and routes.
//! Queries implement the `mediator` request pattern and are called
//! directly by the route handlers.
//!
//! # Features
//!
//! - **product_feed**: on-demand OpenAI product feed document

pub mod product_feed;

use axum::Router;
use std::sync::Arc;

use crate::export::ProductSource;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Catalog the feed is built from
    pub source: Arc<dyn ProductSource>,
}

/// Creates the API router with all feature routes mounted
///
/// - `/openai/product_feed` - product feed document
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest(
        "/openai",
        product_feed::product_feed_routes().with_state(state.source),
    )
}
