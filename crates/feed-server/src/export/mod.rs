//! Product feed export pipeline
//!
//! Records from a [`ProductSource`] are mapped to [`FeedItem`]s, rendered in
//! one of the [`FeedFormat`]s and pushed to a remote file server by a
//! [`FeedTransport`]. [`FeedExportJob`] runs the whole pipeline once and
//! [`FeedScheduler`] runs it daily.

pub mod config;
pub mod error;
pub mod format;
pub mod job;
pub mod mapper;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod serializer;
pub mod source;
pub mod transport;

pub use config::{DeliveryCredentials, DeliveryProtocol, DeliverySettings, ExportConfig, NotifyConfig};
pub use error::ExportError;
pub use format::FeedFormat;
pub use job::{Clock, ExportReport, FeedExportJob, JobState};
pub use mapper::{map_product, map_products, MappedFeed};
pub use models::{FeedItem, NativeType, ProductRecord, Seller, FEED_COLUMNS};
pub use notify::{LogNotifier, Notification, Notifier, NotifyError, Severity, SlackNotifier};
pub use scheduler::{next_run_after, FeedScheduler};
pub use serializer::{render, render_named};
pub use source::{PgProductSource, ProductSource, StaticProductSource};
pub use transport::{
    remote_path, render_filename, transport_for, ConfiguredTransport, FeedTransport, UploadRequest,
};
