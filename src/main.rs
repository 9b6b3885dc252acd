// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]

//! songplay-etl CLI
//!
//! Runs the ETL job once with `config/etl.yaml`

use clap::Parser;
use songplay_etl::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
