//! Job notifications
//!
//! Success and failure share one [`Notifier`] capability; they differ only
//! in subject, message and [`Severity`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

use super::config::NotifyConfig;

pub const SUCCESS_SUBJECT: &str = "OpenAI Product Feed";
pub const FAILURE_SUBJECT: &str = "OpenAI Product Feed Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Failure,
}

impl Severity {
    /// Colour tag understood by the chat sink
    pub fn color(self) -> &'static str {
        match self {
            Severity::Success => "green",
            Severity::Failure => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub channel: String,
    pub subject: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            subject: SUCCESS_SUBJECT.to_string(),
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn failure(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            subject: FAILURE_SUBJECT.to_string(),
            message: message.into(),
            severity: Severity::Failure,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts notifications to a Slack incoming webhook
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    fn payload(notification: &Notification) -> serde_json::Value {
        json!({
            "channel": notification.channel,
            "attachments": [{
                "color": notification.severity.color(),
                "title": notification.subject,
                "text": notification.message,
            }],
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&Self::payload(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Writes notifications to the log only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification.severity {
            Severity::Success => info!(
                channel = %notification.channel,
                subject = %notification.subject,
                color = notification.severity.color(),
                "{}",
                notification.message
            ),
            Severity::Failure => error!(
                channel = %notification.channel,
                subject = %notification.subject,
                color = notification.severity.color(),
                "{}",
                notification.message
            ),
        }
        Ok(())
    }
}

/// Pick the sink from configuration, falling back to the log
pub fn notifier_from_config(config: &NotifyConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match config.slack_webhook_url.as_deref() {
        Some(url) => Ok(Box::new(SlackNotifier::new(url, config.timeout())?)),
        None => Ok(Box::new(LogNotifier)),
    }
}
