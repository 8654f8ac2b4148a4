//! Product Feed Common Library
//!
//! Shared utilities and error handling for the product feed workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`FeedError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by `LOG_*` environment variables
//! - **Checksums**: SHA-256 digests of rendered feed payloads
//!
//! # Example
//!
//! ```no_run
//! use feed_common::checksum::Checksum;
//! use feed_common::Result;
//!
//! fn fingerprint(path: &str) -> Result<()> {
//!     let checksum = Checksum::from_file(path)?;
//!     tracing::info!(%checksum, "feed fingerprint");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checksum;
pub mod error;
pub mod logging;

pub use error::{FeedError, Result};
