//! glyco-ui - desktop form for the diabetes prediction service.

mod app;
mod panel;

use anyhow::{Context, Result};
use clap::Parser;
use glyco_client::cli::ConnectionArgs;
use glyco_client::PredictClient;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::PredictionApp;

/// Desktop form for the diabetes prediction service
#[derive(Parser, Debug)]
#[command(name = "glyco-ui")]
#[command(author, version, about, long_about = None)]
struct UiArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("glyco_ui=info".parse()?)
                .add_directive("glyco_core=info".parse()?),
        )
        .init();

    let args = UiArgs::parse();
    let config = args.connection.resolve()?;
    let client = PredictClient::new(&config).context("configure prediction client")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("start async runtime")?;

    info!(base_url = %config.base_url, "starting prediction window");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("glyco")
            .with_inner_size([520.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "glyco",
        options,
        Box::new(move |_cc| Ok(Box::new(PredictionApp::new(client, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("run prediction window: {e}"))
}
