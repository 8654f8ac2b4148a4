//! Product feed routes

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use super::queries::{get_feed::handle as handle_get_feed, GetProductFeedQuery, ProductFeedResponse};
use crate::error::AppError;
use crate::export::ProductSource;

/// Create product feed routes
pub fn product_feed_routes() -> Router<Arc<dyn ProductSource>> {
    Router::new().route("/product_feed", get(get_product_feed))
}

/// Current product feed
///
/// GET /openai/product_feed
async fn get_product_feed(
    State(source): State<Arc<dyn ProductSource>>,
) -> Result<Json<ProductFeedResponse>, AppError> {
    let response = handle_get_feed(source.as_ref(), GetProductFeedQuery).await?;
    Ok(Json(response))
}
