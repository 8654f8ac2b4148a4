//! feed-export - OpenAI product feed export tool

use anyhow::Result;
use clap::Parser;
use feed_cli::{push, render, Cli, Command};
use feed_common::logging::{init_logging, LogConfig, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("feed-export".to_string())
        .build()
        .with_env_overrides()?;

    let _log_guard = init_logging(&log_config)?;

    match cli.command {
        Command::Render {
            input,
            format,
            output,
        } => {
            let summary = render::run(&input, &format, &output).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        },
        Command::Push { input, format } => {
            let report = push::run(input.as_deref(), format.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
    }

    Ok(())
}
