//! Feed export job
//!
//! One execution walks Idle → Generating → Uploading → Succeeded | Failed.
//! Errors from any step are reported once through the notifier and then
//! returned unchanged. The temporary artifact is removed on every path
//! before the notification goes out.

use chrono::{DateTime, Utc};
use feed_common::checksum::Checksum;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::{DeliveryProtocol, ExportConfig};
use super::error::ExportError;
use super::format::FeedFormat;
use super::mapper::map_products;
use super::notify::{Notification, Notifier};
use super::serializer::render;
use super::source::ProductSource;
use super::transport::{remote_path, render_filename, FeedTransport, UploadRequest};

pub const ARTIFACT_PREFIX: &str = "openai_product_feed";

/// Time source, injectable so tests can pin the date
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum JobState {
    Idle = 0,
    Generating = 1,
    Uploading = 2,
    Succeeded = 3,
    Failed = 4,
}

impl JobState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => JobState::Generating,
            2 => JobState::Uploading,
            3 => JobState::Succeeded,
            4 => JobState::Failed,
            _ => JobState::Idle,
        }
    }
}

/// Summary of a successful execution
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub run_id: Uuid,
    pub format: FeedFormat,
    pub protocol: DeliveryProtocol,
    pub items_exported: usize,
    pub records_skipped: usize,
    pub bytes_written: u64,
    pub sha256: String,
    pub remote_path: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_secs: f64,
}

/// Generation facts kept after the artifact is gone
struct Summary {
    format: FeedFormat,
    items_exported: usize,
    records_skipped: usize,
    checksum: Checksum,
}

/// Payload staged on disk, ready for upload
struct Generated {
    artifact: NamedTempFile,
    summary: Summary,
}

struct Delivered {
    protocol: DeliveryProtocol,
    bytes_written: u64,
    remote_path: String,
}

pub struct FeedExportJob {
    source: Arc<dyn ProductSource>,
    transport: Arc<dyn FeedTransport>,
    notifier: Arc<dyn Notifier>,
    config: ExportConfig,
    clock: Clock,
    state: AtomicU8,
}

impl FeedExportJob {
    pub fn new(
        source: Arc<dyn ProductSource>,
        transport: Arc<dyn FeedTransport>,
        notifier: Arc<dyn Notifier>,
        config: ExportConfig,
    ) -> Self {
        Self {
            source,
            transport,
            notifier,
            config,
            clock: Utc::now,
            state: AtomicU8::new(JobState::Idle as u8),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// State reached by the most recent execution
    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Execute the export once
    pub async fn run(&self) -> Result<ExportReport, ExportError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("feed_export", %run_id, format = %self.config.format);

        async move {
            let started_at = (self.clock)();
            let timer = Instant::now();
            info!("Starting product feed export");

            let outcome = self.execute().await;
            let channel = self.config.notify.channel.clone();

            match outcome {
                Ok((summary, delivered)) => {
                    self.transition(JobState::Succeeded);

                    let report = ExportReport {
                        run_id,
                        format: summary.format,
                        protocol: delivered.protocol,
                        items_exported: summary.items_exported,
                        records_skipped: summary.records_skipped,
                        bytes_written: delivered.bytes_written,
                        sha256: summary.checksum.to_string(),
                        remote_path: delivered.remote_path,
                        started_at,
                        completed_at: (self.clock)(),
                        duration_secs: timer.elapsed().as_secs_f64(),
                    };

                    info!(
                        items = report.items_exported,
                        skipped = report.records_skipped,
                        bytes = report.bytes_written,
                        sha256 = %report.sha256,
                        remote_path = %report.remote_path,
                        "Product feed export succeeded"
                    );

                    let message = format!(
                        "Successfully pushed OpenAI product feed ({}) to {}",
                        report.format.as_str().to_uppercase(),
                        report.protocol.label()
                    );
                    self.send(Notification::success(channel, message)).await;

                    Ok(report)
                },
                Err(e) => {
                    self.transition(JobState::Failed);
                    error!(kind = e.kind(), "Product feed export failed: {}", e);

                    let message = format!("Failed to push OpenAI product feed: {}", e);
                    self.send(Notification::failure(channel, message)).await;

                    Err(e)
                },
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self) -> Result<(Summary, Delivered), ExportError> {
        self.transition(JobState::Generating);
        let generated = self.generate().await?;

        self.transition(JobState::Uploading);
        let uploaded = self.deliver(&generated).await;

        let Generated { artifact, summary } = generated;
        let path = artifact.path().to_path_buf();
        if let Err(e) = artifact.close() {
            warn!(path = %path.display(), "Failed to remove feed artifact: {}", e);
        } else {
            debug!(path = %path.display(), "Removed feed artifact");
        }

        Ok((summary, uploaded?))
    }

    async fn generate(&self) -> Result<Generated, ExportError> {
        let format: FeedFormat = self.config.format.parse()?;

        let records = self.source.fetch_listable().await?;
        debug!(records = records.len(), "Fetched product records");

        let mapped = map_products(&records)?;
        let payload = render(&mapped.items, format)?;
        let checksum = Checksum::of_bytes(&payload);

        let suffix = format!(".{}", format.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(ARTIFACT_PREFIX).suffix(&suffix);
        let mut artifact = match &self.config.artifact_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        artifact.write_all(&payload)?;
        artifact.flush()?;
        Checksum::from_file(artifact.path())?.verify(checksum.as_str())?;

        info!(
            items = mapped.items.len(),
            skipped = mapped.skipped,
            bytes = payload.len(),
            sha256 = %checksum,
            "Rendered product feed"
        );

        Ok(Generated {
            artifact,
            summary: Summary {
                format,
                items_exported: mapped.items.len(),
                records_skipped: mapped.skipped,
                checksum,
            },
        })
    }

    async fn deliver(&self, generated: &Generated) -> Result<Delivered, ExportError> {
        let credentials = self.config.delivery.resolve()?;
        let filename = render_filename(&credentials.filename_pattern, (self.clock)())?;
        let remote = remote_path(&credentials.target_directory, &filename);
        let protocol = credentials.protocol;

        info!(
            protocol = protocol.label(),
            host = %credentials.host,
            remote_path = %remote,
            "Uploading product feed"
        );

        let request = UploadRequest {
            local_path: generated.artifact.path().to_path_buf(),
            remote_path: remote.clone(),
            credentials,
        };
        let bytes_written = self.transport.upload(&request).await?;

        Ok(Delivered {
            protocol,
            bytes_written,
            remote_path: remote,
        })
    }

    async fn send(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(subject = %notification.subject, "Failed to send notification: {}", e);
        }
    }

    fn transition(&self, next: JobState) {
        let previous = JobState::from_u8(self.state.swap(next as u8, Ordering::SeqCst));
        info!(from = ?previous, to = ?next, "Export state changed");
    }
}
