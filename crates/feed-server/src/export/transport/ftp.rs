//! FTP delivery over `suppaftp`
//!
//! Uses Extended Passive Mode (EPSV) for NAT/firewall compatibility and
//! binary transfer so the payload is written byte for byte.

use async_trait::async_trait;
use std::fs::File;
use std::net::ToSocketAddrs;
use suppaftp::FtpStream;
use tracing::{debug, info, warn};

use super::{run_blocking, FeedTransport, UploadRequest};
use crate::export::error::ExportError;

#[derive(Debug, Clone, Default)]
pub struct FtpTransport;

impl FtpTransport {
    fn upload_sync(request: &UploadRequest) -> Result<u64, ExportError> {
        let credentials = &request.credentials;
        let mut local = File::open(&request.local_path)?;

        debug!("Connecting to FTP server: {}:{}", credentials.host, credentials.port);
        let address = (credentials.host.as_str(), credentials.port)
            .to_socket_addrs()
            .map_err(|e| transport_error("Failed to resolve FTP host", e))?
            .next()
            .ok_or_else(|| {
                ExportError::Transport(format!("No address found for {}", credentials.host))
            })?;

        let mut ftp_stream = FtpStream::connect_timeout(address, credentials.timeout)
            .map_err(|e| transport_error("Connection failed", e))?;

        ftp_stream.set_mode(suppaftp::Mode::ExtendedPassive);

        debug!("Logging in as: {}", credentials.username);
        ftp_stream
            .login(&credentials.username, &credentials.password)
            .map_err(|e| transport_error("Failed to login to FTP server", e))?;

        ftp_stream
            .transfer_type(suppaftp::types::FileType::Binary)
            .map_err(|e| transport_error("Failed to set binary mode", e))?;

        let bytes = ftp_stream
            .put_file(&request.remote_path, &mut local)
            .map_err(|e| transport_error(&format!("Failed to write {}", request.remote_path), e))?;

        if let Err(e) = ftp_stream.quit() {
            warn!("Failed to quit FTP session gracefully: {}", e);
        }

        Ok(bytes)
    }
}

#[async_trait]
impl FeedTransport for FtpTransport {
    async fn upload(&self, request: &UploadRequest) -> Result<u64, ExportError> {
        let owned = request.clone();
        let bytes = run_blocking("FTP", move || Self::upload_sync(&owned)).await?;

        info!(
            "Uploaded {} bytes to ftp://{}{}",
            bytes, request.credentials.host, request.remote_path
        );
        Ok(bytes)
    }
}

fn transport_error(context: &str, err: impl std::fmt::Display) -> ExportError {
    ExportError::Transport(format!("{}: {}", context, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::config::{DeliveryCredentials, DeliveryProtocol};
    use std::io::Write as _;
    use std::net::TcpListener;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"id,title\n").unwrap();

        let request = UploadRequest {
            local_path: artifact.path().to_path_buf(),
            remote_path: "/feeds/feed.csv".to_string(),
            credentials: DeliveryCredentials {
                protocol: DeliveryProtocol::Ftp,
                host: "127.0.0.1".to_string(),
                port,
                username: "anonymous".to_string(),
                password: "user@example.com".to_string(),
                target_directory: "/feeds".to_string(),
                filename_pattern: "feed.csv".to_string(),
                timeout: Duration::from_secs(2),
            },
        };

        let err = FtpTransport.upload(&request).await.unwrap_err();
        assert!(matches!(err, ExportError::Transport(_)));
        assert!(err.to_string().contains("Connection failed"));
    }
}
