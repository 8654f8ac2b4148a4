//! SFTP delivery over `ssh2`

use async_trait::async_trait;
use ssh2::Session;
use std::fs::File;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{run_blocking, FeedTransport, UploadRequest};
use crate::export::error::ExportError;

#[derive(Debug, Clone, Default)]
pub struct SftpTransport;

impl SftpTransport {
    fn upload_sync(request: &UploadRequest) -> Result<u64, ExportError> {
        let credentials = &request.credentials;
        let mut local = File::open(&request.local_path)?;

        debug!("Connecting to SFTP server: {}:{}", credentials.host, credentials.port);
        let address = (credentials.host.as_str(), credentials.port)
            .to_socket_addrs()
            .map_err(|e| transport_error("Failed to resolve SFTP host", e))?
            .next()
            .ok_or_else(|| {
                ExportError::Transport(format!("No address found for {}", credentials.host))
            })?;

        let tcp = TcpStream::connect_timeout(&address, credentials.timeout)
            .map_err(|e| transport_error("Connection failed", e))?;
        tcp.set_read_timeout(Some(credentials.timeout))
            .map_err(|e| transport_error("Failed to set read timeout", e))?;
        tcp.set_write_timeout(Some(credentials.timeout))
            .map_err(|e| transport_error("Failed to set write timeout", e))?;

        let mut session =
            Session::new().map_err(|e| transport_error("Failed to create SSH session", e))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(credentials.timeout.as_millis()).unwrap_or(u32::MAX));
        session
            .handshake()
            .map_err(|e| transport_error("SSH handshake failed", e))?;

        debug!("Authenticating as: {}", credentials.username);
        session
            .userauth_password(&credentials.username, &credentials.password)
            .map_err(|e| transport_error("Authentication failed", e))?;
        if !session.authenticated() {
            return Err(ExportError::Transport(format!(
                "Authentication failed for {}",
                credentials.username
            )));
        }

        let sftp = session
            .sftp()
            .map_err(|e| transport_error("Failed to open SFTP channel", e))?;
        let mut remote = sftp
            .create(Path::new(&request.remote_path))
            .map_err(|e| transport_error(&format!("Failed to create {}", request.remote_path), e))?;

        let bytes = std::io::copy(&mut local, &mut remote)
            .map_err(|e| transport_error(&format!("Failed to write {}", request.remote_path), e))?;
        remote
            .flush()
            .map_err(|e| transport_error(&format!("Failed to flush {}", request.remote_path), e))?;
        drop(remote);

        if let Err(e) = session.disconnect(None, "feed upload complete", None) {
            warn!("Failed to close SFTP session gracefully: {}", e);
        }

        Ok(bytes)
    }
}

#[async_trait]
impl FeedTransport for SftpTransport {
    async fn upload(&self, request: &UploadRequest) -> Result<u64, ExportError> {
        let owned = request.clone();
        let bytes = run_blocking("SFTP", move || Self::upload_sync(&owned)).await?;

        info!(
            "Uploaded {} bytes to sftp://{}{}",
            bytes, request.credentials.host, request.remote_path
        );
        Ok(bytes)
    }
}

fn transport_error(context: &str, err: impl std::fmt::Display) -> ExportError {
    ExportError::Transport(format!("{}: {}", context, err))
}
