//! Export configuration
//!
//! Everything is read from `FEED_EXPORT_*`, `FEED_DELIVERY_*` and
//! `FEED_NOTIFY_*` environment variables. Delivery settings are kept as
//! optional values and only resolved into [`DeliveryCredentials`] when a
//! job reaches its upload step, so a missing credential fails that run
//! (and notifies) instead of preventing the server from starting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ExportError;
use crate::config::env_or;

pub const DEFAULT_SFTP_PORT: u16 = 22;
pub const DEFAULT_FTP_PORT: u16 = 21;
pub const DEFAULT_FEED_FORMAT: &str = "tsv";
pub const DEFAULT_SCHEDULE_HOUR_UTC: u32 = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_NOTIFY_CHANNEL: &str = "integrations";
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// File transfer protocol used to deliver the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryProtocol {
    #[default]
    Sftp,
    Ftp,
}

impl DeliveryProtocol {
    pub fn default_port(self) -> u16 {
        match self {
            DeliveryProtocol::Sftp => DEFAULT_SFTP_PORT,
            DeliveryProtocol::Ftp => DEFAULT_FTP_PORT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryProtocol::Sftp => "SFTP",
            DeliveryProtocol::Ftp => "FTP",
        }
    }
}

impl std::str::FromStr for DeliveryProtocol {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sftp" => Ok(DeliveryProtocol::Sftp),
            "ftp" => Ok(DeliveryProtocol::Ftp),
            other => Err(ExportError::Configuration(format!(
                "FEED_DELIVERY_PROTOCOL must be 'sftp' or 'ftp', got: {}",
                other
            ))),
        }
    }
}

/// Complete remote endpoint settings, ready for a transport
#[derive(Clone, PartialEq, Eq)]
pub struct DeliveryCredentials {
    pub protocol: DeliveryProtocol,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub target_directory: String,
    /// strftime pattern, e.g. `gumroad_products_%Y%m%d.tsv`
    pub filename_pattern: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for DeliveryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryCredentials")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("target_directory", &self.target_directory)
            .field("filename_pattern", &self.filename_pattern)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Delivery settings as loaded; any field may be missing
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeliverySettings {
    pub protocol: Option<String>,
    pub host: Option<String>,
    /// Raw value; parsed in [`DeliverySettings::resolve`]
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub target_directory: Option<String>,
    pub filename_pattern: Option<String>,
    pub timeout_secs: Option<String>,
}

impl std::fmt::Debug for DeliverySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliverySettings")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("target_directory", &self.target_directory)
            .field("filename_pattern", &self.filename_pattern)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DeliverySettings {
    pub fn from_env() -> Self {
        Self {
            protocol: env_string("FEED_DELIVERY_PROTOCOL"),
            host: env_string("FEED_DELIVERY_HOST"),
            port: env_string("FEED_DELIVERY_PORT"),
            username: env_string("FEED_DELIVERY_USERNAME"),
            password: env_string("FEED_DELIVERY_PASSWORD"),
            target_directory: env_string("FEED_DELIVERY_TARGET_DIRECTORY"),
            filename_pattern: env_string("FEED_DELIVERY_FILENAME_PATTERN"),
            timeout_secs: env_string("FEED_DELIVERY_TIMEOUT_SECS"),
        }
    }

    /// True when no delivery variable is set at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Turn the loaded settings into credentials, naming the first missing variable
    pub fn resolve(&self) -> Result<DeliveryCredentials, ExportError> {
        if self.is_empty() {
            return Err(ExportError::Configuration(
                "Delivery credentials not configured (set FEED_DELIVERY_* variables)".to_string(),
            ));
        }

        let protocol = match self.protocol.as_deref() {
            Some(p) => p.parse()?,
            None => DeliveryProtocol::default(),
        };

        let credentials = DeliveryCredentials {
            protocol,
            host: required(&self.host, "FEED_DELIVERY_HOST")?,
            port: match self.port.as_deref() {
                Some(raw) => parse_setting(raw, "FEED_DELIVERY_PORT", "a port number")?,
                None => protocol.default_port(),
            },
            username: required(&self.username, "FEED_DELIVERY_USERNAME")?,
            password: required(&self.password, "FEED_DELIVERY_PASSWORD")?,
            target_directory: required(&self.target_directory, "FEED_DELIVERY_TARGET_DIRECTORY")?,
            filename_pattern: required(&self.filename_pattern, "FEED_DELIVERY_FILENAME_PATTERN")?,
            timeout: Duration::from_secs(match self.timeout_secs.as_deref() {
                Some(raw) => parse_setting(raw, "FEED_DELIVERY_TIMEOUT_SECS", "a number of seconds")?,
                None => DEFAULT_DELIVERY_TIMEOUT_SECS,
            }),
        };

        if credentials.port == 0 {
            return Err(ExportError::Configuration(
                "FEED_DELIVERY_PORT must be greater than 0".to_string(),
            ));
        }
        if credentials.timeout.is_zero() {
            return Err(ExportError::Configuration(
                "FEED_DELIVERY_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(credentials)
    }
}

/// Where job notifications go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Slack incoming-webhook URL; notifications are only logged when unset
    pub slack_webhook_url: Option<String>,
    pub channel: String,
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            slack_webhook_url: None,
            channel: DEFAULT_NOTIFY_CHANNEL.to_string(),
            timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
        }
    }
}

impl NotifyConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            slack_webhook_url: env_string("FEED_NOTIFY_SLACK_WEBHOOK_URL"),
            channel: env_string("FEED_NOTIFY_CHANNEL")
                .unwrap_or_else(|| DEFAULT_NOTIFY_CHANNEL.to_string()),
            timeout_secs: env_or("FEED_NOTIFY_TIMEOUT_SECS", DEFAULT_NOTIFY_TIMEOUT_SECS)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Whether the server runs the daily scheduler
    pub enabled: bool,
    /// Raw format identifier; parsed by the job so bad values fail a run visibly
    pub format: String,
    pub schedule_hour_utc: u32,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    /// Directory for the temporary feed artifact (system temp dir when unset)
    pub artifact_dir: Option<PathBuf>,
    pub delivery: DeliverySettings,
    pub notify: NotifyConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: DEFAULT_FEED_FORMAT.to_string(),
            schedule_hour_utc: DEFAULT_SCHEDULE_HOUR_UTC,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            artifact_dir: None,
            delivery: DeliverySettings::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Load export configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            enabled: env_or("FEED_EXPORT_ENABLED", false)?,
            format: std::env::var("FEED_EXPORT_FORMAT")
                .unwrap_or_else(|_| DEFAULT_FEED_FORMAT.to_string()),
            schedule_hour_utc: env_or("FEED_EXPORT_SCHEDULE_HOUR_UTC", DEFAULT_SCHEDULE_HOUR_UTC)?,
            max_attempts: env_or("FEED_EXPORT_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            retry_delay_secs: env_or("FEED_EXPORT_RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS)?,
            artifact_dir: env_string("FEED_EXPORT_ARTIFACT_DIR").map(PathBuf::from),
            delivery: DeliverySettings::from_env(),
            notify: NotifyConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate scheduling settings; delivery is checked per run
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.schedule_hour_utc > 23 {
            anyhow::bail!(
                "FEED_EXPORT_SCHEDULE_HOUR_UTC must be between 0 and 23, got: {}",
                self.schedule_hour_utc
            );
        }
        if self.max_attempts == 0 {
            anyhow::bail!("FEED_EXPORT_MAX_ATTEMPTS must be greater than 0");
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(value: &Option<String>, key: &str) -> Result<String, ExportError> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| ExportError::Configuration(format!("Delivery setting {} is missing", key)))
}

fn parse_setting<T: std::str::FromStr>(raw: &str, key: &str, expected: &str) -> Result<T, ExportError> {
    raw.trim().parse().map_err(|_| {
        ExportError::Configuration(format!("{} must be {}, got: {}", key, expected, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_settings() -> DeliverySettings {
        DeliverySettings {
            protocol: None,
            host: Some("sftp.example.com".to_string()),
            port: None,
            username: Some("test_user".to_string()),
            password: Some("test_password".to_string()),
            target_directory: Some("/feeds".to_string()),
            filename_pattern: Some("gumroad_products_%Y%m%d.tsv".to_string()),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_resolve_defaults_to_sftp_port_22() {
        let credentials = complete_settings().resolve().unwrap();
        assert_eq!(credentials.protocol, DeliveryProtocol::Sftp);
        assert_eq!(credentials.port, 22);
        assert_eq!(credentials.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_resolve_ftp_uses_port_21() {
        let settings = DeliverySettings {
            protocol: Some("FTP".to_string()),
            ..complete_settings()
        };
        let credentials = settings.resolve().unwrap();
        assert_eq!(credentials.protocol, DeliveryProtocol::Ftp);
        assert_eq!(credentials.port, 21);
    }

    #[test]
    fn test_resolve_without_any_settings() {
        let err = DeliverySettings::default().resolve().unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_resolve_names_missing_field() {
        let settings = DeliverySettings {
            password: None,
            ..complete_settings()
        };
        let err = settings.resolve().unwrap_err();
        assert!(err.to_string().contains("FEED_DELIVERY_PASSWORD"));
    }

    #[test]
    fn test_resolve_parses_explicit_port_and_timeout() {
        let settings = DeliverySettings {
            port: Some(" 2222 ".to_string()),
            timeout_secs: Some("15".to_string()),
            ..complete_settings()
        };
        let credentials = settings.resolve().unwrap();
        assert_eq!(credentials.port, 2222);
        assert_eq!(credentials.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_resolve_rejects_malformed_port() {
        let settings = DeliverySettings {
            port: Some("2222x".to_string()),
            ..complete_settings()
        };
        let err = settings.resolve().unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("FEED_DELIVERY_PORT must be a port number, got: 2222x"));

        let settings = DeliverySettings {
            port: Some("70000".to_string()),
            ..complete_settings()
        };
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn test_resolve_rejects_malformed_timeout() {
        let settings = DeliverySettings {
            timeout_secs: Some("abc".to_string()),
            ..complete_settings()
        };
        let err = settings.resolve().unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("FEED_DELIVERY_TIMEOUT_SECS"));
    }

    #[test]
    fn test_resolve_rejects_unknown_protocol() {
        let settings = DeliverySettings {
            protocol: Some("scp".to_string()),
            ..complete_settings()
        };
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", complete_settings().resolve().unwrap());
        assert!(!rendered.contains("test_password"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.format, "tsv");
        assert_eq!(config.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_config_validation() {
        let config = ExportConfig {
            schedule_hour_utc: 24,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
