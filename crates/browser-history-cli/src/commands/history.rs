use anyhow::{Result, anyhow};
use browser_history_browser::{Aggregator, Error};
use browser_history_core::Config;
use browser_history_core::history::HistoryWriter;
use chrono::Utc;
use std::io::{self, Write};

/// Fetch history for the configured browsers and print it to stdout
pub fn execute(aggregator: &Aggregator, config: &Config) -> Result<()> {
    let window = config.window(Utc::now())?;

    tracing::debug!(
        "Reading history from {} to {}",
        window.start.to_rfc3339(),
        window.end.to_rfc3339()
    );

    let entries = match aggregator.fetch(&config.browsers, &window, config.debug) {
        Ok(entries) => entries,
        Err(Error::NoValidBrowsers) => {
            return Err(anyhow!(
                "no valid browsers specified (available: {})",
                aggregator.registry().names().join(", ")
            ));
        }
        Err(err) => return Err(err.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    HistoryWriter::write(&entries, config.output, config.pretty, &mut out)?;
    out.flush()?;

    Ok(())
}
