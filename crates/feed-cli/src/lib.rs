//! Product Feed CLI Library
//!
//! One-shot commands behind the `feed-export` binary:
//!
//! - [`render`]: render a feed from a JSON product file to a local file
//! - [`push`]: run the export job once, with the configured retries

pub mod push;
pub mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feed-export")]
#[command(author, version, about = "OpenAI product feed export tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a feed locally without uploading
    Render {
        /// JSON array of product records
        #[arg(short, long)]
        input: PathBuf,

        /// Feed format: csv, tsv, xml or json
        #[arg(short, long, default_value = "tsv")]
        format: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run the export job once and deliver the feed
    Push {
        /// Read products from a JSON file instead of DATABASE_URL
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override FEED_EXPORT_FORMAT
        #[arg(short, long)]
        format: Option<String>,
    },
}
