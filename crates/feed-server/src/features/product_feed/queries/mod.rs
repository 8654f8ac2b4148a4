//! Product feed queries

pub mod get_feed;

pub use get_feed::{GetProductFeedQuery, ProductFeedResponse};
