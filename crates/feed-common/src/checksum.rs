//! Payload fingerprints
//!
//! Every feed the export job pushes is fingerprinted with SHA-256 so that a
//! delivered file can be matched against the run that produced it.

use crate::error::{FeedError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Hex encoded SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Digest an in-memory payload
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Digest any readable source in 8 KiB chunks
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Digest a file on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = std::fs::File::open(path)?;
        Self::from_reader(&mut file)
    }

    /// Compare against an expected hex digest (case-insensitive)
    pub fn verify(&self, expected: &str) -> Result<()> {
        if self.0.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(FeedError::ChecksumMismatch {
                expected: expected.to_string(),
                actual: self.0.clone(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
