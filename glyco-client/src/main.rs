//! glyco - submit diabetes predictions from the terminal.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glyco_client::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the result panel, logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("glyco_client=info".parse()?))
        .init();

    let cli = Cli::parse();
    cli.run().await
}
