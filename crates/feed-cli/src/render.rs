//! Local feed rendering

use anyhow::{Context, Result};
use feed_common::checksum::Checksum;
use feed_server::export::{map_products, render, FeedFormat, ProductSource, StaticProductSource};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of a local render
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub items: usize,
    pub skipped: usize,
    pub bytes: usize,
    pub sha256: String,
}

pub async fn run(input: &Path, format: &str, output: &Path) -> Result<RenderSummary> {
    let format: FeedFormat = format.parse()?;

    let source = StaticProductSource::from_json_file(input)
        .with_context(|| format!("Failed to load products from {}", input.display()))?;

    let records = source.fetch_listable().await?;
    let mapped = map_products(&records)?;
    let payload = render(&mapped.items, format)?;
    let checksum = Checksum::of_bytes(&payload);

    tokio::fs::write(output, &payload)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let summary = RenderSummary {
        items: mapped.items.len(),
        skipped: mapped.skipped,
        bytes: payload.len(),
        sha256: checksum.to_string(),
    };

    info!(
        items = summary.items,
        skipped = summary.skipped,
        bytes = summary.bytes,
        sha256 = %summary.sha256,
        "Wrote {}",
        output.display()
    );

    Ok(summary)
}
