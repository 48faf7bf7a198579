use anyhow::{Context, Result};
use browser_history_browser::Aggregator;
use browser_history_core::Config;
use browser_history_server::{HistoryHandler, HistoryServer};

/// Run the HTTP API until Ctrl+C
pub fn execute(aggregator: Aggregator, config: Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let port = config.port;
    let handler = HistoryHandler::new(aggregator, config);

    runtime.block_on(HistoryServer::new(port, handler).start())?;

    Ok(())
}
