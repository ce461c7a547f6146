//! CLI definition using clap

use clap::{Parser, Subcommand};
use haulquote_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "haulquote")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Junk removal volume and price estimation from photos")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Primary model override
    #[arg(long, global = true)]
    pub primary_model: Option<String>,

    /// Secondary model override
    #[arg(long, global = true)]
    pub secondary_model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate volume and price from photos of one junk pile
    Estimate {
        /// Image files (1-10) showing the pile
        images: Vec<PathBuf>,

        /// Send a raw JSON request body instead of image files
        #[arg(long, short = 'r', conflicts_with = "images")]
        request: Option<PathBuf>,

        /// Forward to a remote estimate endpoint. Uses config proxy_upstream if no URL is given.
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        remote: Option<String>,
    },

    /// Show price range and load size for a volume in cubic yards
    Quote {
        /// Volume in cubic yards
        volume: f64,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set primary model
        #[arg(long)]
        set_primary_model: Option<String>,

        /// Set secondary model
        #[arg(long)]
        set_secondary_model: Option<String>,

        /// Set the environment variable holding the API key
        #[arg(long)]
        set_api_key_env: Option<String>,

        /// Set vision API base URL
        #[arg(long)]
        set_base_url: Option<String>,

        /// Set remote estimate endpoint
        #[arg(long)]
        set_proxy_upstream: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
