//! One-shot export

use anyhow::{Context, Result};
use feed_server::export::{
    notify::notifier_from_config, ConfiguredTransport, ExportConfig, ExportReport, FeedExportJob,
    FeedScheduler, Notifier, PgProductSource, ProductSource, StaticProductSource,
};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(input: Option<&Path>, format: Option<&str>) -> Result<ExportReport> {
    let mut config = ExportConfig::from_env()?;
    if let Some(format) = format {
        config.format = format.to_string();
    }

    let source: Arc<dyn ProductSource> = match input {
        Some(path) => Arc::new(
            StaticProductSource::from_json_file(path)
                .with_context(|| format!("Failed to load products from {}", path.display()))?,
        ),
        None => {
            let url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set when --input is not given")?;
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&url)
                .await
                .context("Failed to connect to database")?;
            Arc::new(PgProductSource::new(pool))
        },
    };

    let notifier: Arc<dyn Notifier> = Arc::from(notifier_from_config(&config.notify)?);
    let job = FeedExportJob::new(source, Arc::new(ConfiguredTransport), notifier, config);

    let report = FeedScheduler::new(Arc::new(job)).run_now().await?;

    info!(
        items = report.items_exported,
        remote_path = %report.remote_path,
        duration_secs = report.duration_secs,
        "Feed pushed"
    );

    Ok(report)
}
