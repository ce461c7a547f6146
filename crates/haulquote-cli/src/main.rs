//! Haulquote - photo-based junk removal volume and price estimation
//!
//! A CLI front end for the two-model estimate pipeline.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
