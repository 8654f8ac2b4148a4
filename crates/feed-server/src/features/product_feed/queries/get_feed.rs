//! Get product feed query
//!
//! Builds the feed document on demand from the product source.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::export::{map_products, ExportError, FeedItem, ProductSource};

/// Query for the full product feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetProductFeedQuery;

/// Feed document, identical in shape to the JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFeedResponse {
    pub products: Vec<FeedItem>,
}

impl Request<Result<ProductFeedResponse, ExportError>> for GetProductFeedQuery {}

pub async fn handle(
    source: &dyn ProductSource,
    _query: GetProductFeedQuery,
) -> Result<ProductFeedResponse, ExportError> {
    let records = source.fetch_listable().await?;
    let mapped = map_products(&records)?;

    tracing::debug!(
        items = mapped.items.len(),
        skipped = mapped.skipped,
        "Built on-demand product feed"
    );

    Ok(ProductFeedResponse {
        products: mapped.items,
    })
}
