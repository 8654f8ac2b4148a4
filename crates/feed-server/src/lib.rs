//! Product Feed Server Library
//!
//! Builds the OpenAI product feed from the marketplace catalog and delivers
//! it to a remote file server once a day.
//!
//! # Overview
//!
//! - **Export Pipeline** ([`export`]): mapping, rendering (CSV, TSV, XML,
//!   JSON), SFTP/FTP delivery, notifications and the daily scheduler
//! - **API Endpoints** ([`features`]): on-demand feed document
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS and request logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use feed_server::export::{
//!     ConfiguredTransport, ExportConfig, FeedExportJob, LogNotifier, StaticProductSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let job = FeedExportJob::new(
//!         Arc::new(StaticProductSource::from_json_file("products.json")?),
//!         Arc::new(ConfiguredTransport),
//!         Arc::new(LogNotifier),
//!         ExportConfig::from_env()?,
//!     );
//!     let report = job.run().await?;
//!     println!("pushed {} items to {}", report.items_exported, report.remote_path);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod middleware;

pub use error::AppError;
