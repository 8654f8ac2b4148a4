//! Daily export scheduler
//!
//! Runs in a background task and fires the export once a day at the
//! configured UTC hour. A trigger retries failed executions with a linear
//! backoff; each attempt is a full job run with its own notification.

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::error::ExportError;
use super::job::{ExportReport, FeedExportJob};

pub struct FeedScheduler {
    job: Arc<FeedExportJob>,
    schedule_hour_utc: u32,
    max_attempts: u32,
    retry_delay: Duration,
}

impl FeedScheduler {
    pub fn new(job: Arc<FeedExportJob>) -> Self {
        let config = job.config();
        Self {
            schedule_hour_utc: config.schedule_hour_utc,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
            job,
        }
    }

    /// Start the scheduler in background
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                hour_utc = self.schedule_hour_utc,
                max_attempts = self.max_attempts,
                "Feed export scheduler started"
            );

            loop {
                let now = Utc::now();
                let next = next_run_after(now, self.schedule_hour_utc);
                let wait = (next - now).to_std().unwrap_or_default();
                info!(next_run = %next, "Next product feed export scheduled");

                sleep(wait).await;

                if let Err(e) = self.run_now().await {
                    error!(kind = e.kind(), "Scheduled product feed export gave up: {}", e);
                }
            }
        })
    }

    /// Run the export now, retrying retryable failures
    pub async fn run_now(&self) -> Result<ExportReport, ExportError> {
        for attempt in 1..=self.max_attempts {
            info!("Export attempt {}/{}", attempt, self.max_attempts);

            match self.job.run().await {
                Ok(report) => return Ok(report),
                Err(e) if !e.is_retryable() => {
                    warn!(kind = e.kind(), "Export failed with a non-retryable error");
                    return Err(e);
                },
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.retry_delay * attempt;
                    warn!(
                        "Export attempt {}/{} failed: {}. Retrying in {}s...",
                        attempt,
                        self.max_attempts,
                        e,
                        delay.as_secs()
                    );
                    sleep(delay).await;
                },
                Err(e) => {
                    error!("Export failed after {} attempts", self.max_attempts);
                    return Err(e);
                },
            }
        }

        Err(ExportError::Configuration(
            "FEED_EXPORT_MAX_ATTEMPTS must be greater than 0".to_string(),
        ))
    }
}

/// First `hour:00 UTC` strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let today = now.date_naive().and_time(time).and_utc();

    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}
