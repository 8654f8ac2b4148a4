//! Feed delivery
//!
//! A transport copies the rendered artifact to
//! `<target directory>/<rendered filename>` on the remote host. The
//! network clients are synchronous and run on the blocking pool.

pub mod ftp;
pub mod sftp;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use super::config::{DeliveryCredentials, DeliveryProtocol};
use super::error::ExportError;

pub use ftp::FtpTransport;
pub use sftp::SftpTransport;

/// One upload of a local artifact
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub credentials: DeliveryCredentials,
}

#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Upload the artifact, returning the number of bytes written remotely
    async fn upload(&self, request: &UploadRequest) -> Result<u64, ExportError>;
}

/// Pick the transport for a configured protocol
pub fn transport_for(protocol: DeliveryProtocol) -> Arc<dyn FeedTransport> {
    match protocol {
        DeliveryProtocol::Sftp => Arc::new(SftpTransport),
        DeliveryProtocol::Ftp => Arc::new(FtpTransport),
    }
}

/// Selects the transport from the credentials of each request
#[derive(Debug, Clone, Default)]
pub struct ConfiguredTransport;

#[async_trait]
impl FeedTransport for ConfiguredTransport {
    async fn upload(&self, request: &UploadRequest) -> Result<u64, ExportError> {
        transport_for(request.credentials.protocol)
            .upload(request)
            .await
    }
}

/// Render a strftime filename pattern for the given UTC instant
pub fn render_filename(pattern: &str, now: DateTime<Utc>) -> Result<String, ExportError> {
    let mut filename = String::new();
    write!(filename, "{}", now.format(pattern)).map_err(|_| {
        ExportError::Configuration(format!("Invalid filename pattern: {}", pattern))
    })?;

    let filename = filename.trim().to_string();
    if filename.is_empty() || filename.contains('/') {
        return Err(ExportError::Configuration(format!(
            "Filename pattern must render to a plain file name: {:?}",
            pattern
        )));
    }

    Ok(filename)
}

/// Join a remote directory and file name with exactly one separator
pub fn remote_path(directory: &str, filename: &str) -> String {
    let directory = directory.trim_end_matches('/');
    let filename = filename.trim_start_matches('/');
    if directory.is_empty() {
        format!("/{}", filename)
    } else {
        format!("{}/{}", directory, filename)
    }
}

/// Run a blocking client on the blocking pool
pub(crate) async fn run_blocking<F>(label: &'static str, f: F) -> Result<u64, ExportError>
where
    F: FnOnce() -> Result<u64, ExportError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExportError::Transport(format!("{} upload task panicked: {}", label, e)))?
}
