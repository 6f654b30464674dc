mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;

use app::DashboardServer;
use config::DashboardConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // Loaded exactly once; a bad dataset stops the process before any port is bound.
    let dataset = data::loader::load_file(&config.data_path).map_err(|e| {
        log::error!("Failed to load {}: {e}", config.data_path.display());
        e
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let addr = config.addr();
    runtime
        .block_on(DashboardServer::new(config, dataset).serve())
        .with_context(|| format!("serving dashboard on {addr}"))
}
