//! Shared fixtures for product feed integration tests
//!
//! Provides record builders, an in-memory transport that captures uploads
//! and a notifier that records every notification it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feed_server::export::{
    DeliverySettings, ExportConfig, ExportError, FeedTransport, NativeType, Notification,
    Notifier, NotifyError, ProductRecord, ProductSource, Seller, UploadRequest,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,feed_server=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// 2024-03-05 06:00 UTC
pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap()
}

pub fn product(id: &str, native_type: NativeType) -> ProductRecord {
    ProductRecord {
        id: id.to_string(),
        name: Some(format!("Product {}", id)),
        description: Some(format!("Description of {}", id)),
        url: format!("https://gumroad.com/l/{}", id),
        thumbnail_url: Some(format!("https://public-files.gumroad.com/{}.png", id)),
        native_type,
        price_cents: Some(1000),
        currency: Some("usd".to_string()),
        requires_shipping: false,
        in_preorder: false,
        max_purchase_count: None,
        remaining_for_sale_count: None,
        refund_policy_enabled: true,
        seller: Some(Seller {
            name: Some("Test Seller".to_string()),
            profile_url: "https://seller.gumroad.com".to_string(),
        }),
        published: true,
        draft: false,
        alive: true,
    }
}

pub fn complete_delivery() -> DeliverySettings {
    DeliverySettings {
        protocol: Some("sftp".to_string()),
        host: Some("sftp.example.com".to_string()),
        port: Some("22".to_string()),
        username: Some("test_user".to_string()),
        password: Some("test_password".to_string()),
        target_directory: Some("/feeds".to_string()),
        filename_pattern: Some("gumroad_products_%Y%m%d.tsv".to_string()),
        timeout_secs: Some("5".to_string()),
    }
}

pub fn export_config(format: &str, artifact_dir: &Path, delivery: DeliverySettings) -> ExportConfig {
    ExportConfig {
        format: format.to_string(),
        artifact_dir: Some(artifact_dir.to_path_buf()),
        delivery,
        retry_delay_secs: 1,
        ..Default::default()
    }
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

/// Captured upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub payload: Vec<u8>,
}

/// Transport that keeps uploads in memory, failing the first `failures` calls
#[derive(Debug, Default)]
pub struct RecordingTransport {
    failures: AtomicUsize,
    pub calls: AtomicUsize,
    pub uploads: Mutex<Vec<Upload>>,
}

impl RecordingTransport {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedTransport for RecordingTransport {
    async fn upload(&self, request: &UploadRequest) -> Result<u64, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ExportError::Transport("Connection failed".to_string()));
        }

        let payload = std::fs::read(&request.local_path)?;
        let bytes = payload.len() as u64;
        self.uploads.lock().unwrap().push(Upload {
            local_path: request.local_path.clone(),
            remote_path: request.remote_path.clone(),
            payload,
        });
        Ok(bytes)
    }
}

/// Notifier that records every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn broken() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Product source whose backing store is down
#[derive(Debug, Default)]
pub struct UnavailableSource;

#[async_trait]
impl ProductSource for UnavailableSource {
    async fn fetch_listable(&self) -> Result<Vec<ProductRecord>, ExportError> {
        Err(ExportError::Source("pool timed out".to_string()))
    }
}
