//! Product record sources
//!
//! The export job and the on-demand endpoint both read through
//! [`ProductSource`]. Implementations return alive, owner-bearing, non-draft
//! records; the `published` rule is applied by the mapper.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::path::Path;
use tracing::debug;

use super::error::ExportError;
use super::models::{NativeType, ProductRecord, Seller};

/// Supplier of catalog snapshots
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_listable(&self) -> Result<Vec<ProductRecord>, ExportError>;
}

/// Row of the `feed_products` relation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub native_type: String,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub requires_shipping: bool,
    pub in_preorder: bool,
    pub max_purchase_count: Option<i64>,
    pub remaining_for_sale_count: Option<i64>,
    pub refund_policy_enabled: bool,
    pub seller_name: Option<String>,
    pub seller_profile_url: Option<String>,
    pub published: bool,
    pub draft: bool,
    pub alive: bool,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        let seller = row.seller_profile_url.map(|profile_url| Seller {
            name: row.seller_name,
            profile_url,
        });

        ProductRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            thumbnail_url: row.thumbnail_url,
            native_type: NativeType::from(row.native_type),
            price_cents: row.price_cents,
            currency: row.currency,
            requires_shipping: row.requires_shipping,
            in_preorder: row.in_preorder,
            max_purchase_count: row.max_purchase_count,
            remaining_for_sale_count: row.remaining_for_sale_count,
            refund_policy_enabled: row.refund_policy_enabled,
            seller,
            published: row.published,
            draft: row.draft,
            alive: row.alive,
        }
    }
}

/// PostgreSQL-backed source
#[derive(Debug, Clone)]
pub struct PgProductSource {
    pool: PgPool,
}

impl PgProductSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductSource for PgProductSource {
    async fn fetch_listable(&self) -> Result<Vec<ProductRecord>, ExportError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, url, thumbnail_url, native_type,
                   price_cents, currency, requires_shipping, in_preorder,
                   max_purchase_count, remaining_for_sale_count, refund_policy_enabled,
                   seller_name, seller_profile_url, published, draft, alive
            FROM feed_products
            WHERE alive AND user_id IS NOT NULL AND NOT draft
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched product rows");
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }
}

/// In-memory source, loadable from a JSON array of records
#[derive(Debug, Clone, Default)]
pub struct StaticProductSource {
    records: Vec<ProductRecord>,
}

impl StaticProductSource {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        let records: Vec<ProductRecord> = serde_json::from_slice(&contents).map_err(|e| {
            ExportError::Source(format!("Invalid product file {}: {}", path.display(), e))
        })?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProductSource for StaticProductSource {
    async fn fetch_listable(&self) -> Result<Vec<ProductRecord>, ExportError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.alive && !r.draft)
            .cloned()
            .collect())
    }
}
