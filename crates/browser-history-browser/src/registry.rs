use crate::chromium::Chromium;
use crate::gecko::Gecko;
use crate::platform::InstallLocation;
use crate::source::{Browser, HistorySource};
use crate::{Error, Result};
use std::sync::Arc;

/// Ordered set of browsers the aggregator can read from
#[derive(Debug, Clone)]
pub struct Registry {
    browsers: Vec<Browser>,
}

impl Registry {
    /// Registry with no browsers
    pub fn empty() -> Self {
        Self {
            browsers: Vec::new(),
        }
    }

    /// Every supported browser at its standard install location
    pub fn installed() -> Self {
        let chromium: Arc<dyn HistorySource> = Arc::new(Chromium);
        let gecko: Arc<dyn HistorySource> = Arc::new(Gecko);

        Self::empty()
            .with(Browser::installed("chrome", InstallLocation::CHROME, chromium.clone()))
            .with(Browser::installed("edge", InstallLocation::EDGE, chromium.clone()))
            .with(Browser::installed("brave", InstallLocation::BRAVE, chromium.clone()))
            .with(Browser::installed("chromium", InstallLocation::CHROMIUM, chromium))
            .with(Browser::installed("firefox", InstallLocation::FIREFOX, gecko))
    }

    /// Add a browser, replacing any registered under the same name
    pub fn with(mut self, browser: Browser) -> Self {
        self.register(browser);
        self
    }

    pub fn register(&mut self, browser: Browser) {
        match self
            .browsers
            .iter_mut()
            .find(|existing| existing.name().eq_ignore_ascii_case(browser.name()))
        {
            Some(existing) => *existing = browser,
            None => self.browsers.push(browser),
        }
    }

    /// Look up a browser by name, ignoring case and surrounding whitespace
    pub fn get(&self, name: &str) -> Option<&Browser> {
        let name = name.trim();
        self.browsers
            .iter()
            .find(|browser| browser.name().eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.browsers.iter().map(Browser::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Browser> {
        self.browsers.iter()
    }

    /// Resolve requested names to browsers in request order.
    ///
    /// An empty request selects every registered browser in registry order.
    /// Unknown names are dropped; if nothing is left the request is invalid.
    pub fn select(&self, requested: &[String]) -> Result<Vec<&Browser>> {
        if requested.is_empty() {
            return if self.browsers.is_empty() {
                Err(Error::NoValidBrowsers)
            } else {
                Ok(self.browsers.iter().collect())
            };
        }

        let mut selected: Vec<&Browser> = Vec::new();
        for name in requested {
            match self.get(name) {
                Some(browser) => {
                    if !selected.iter().any(|b| b.name() == browser.name()) {
                        selected.push(browser);
                    }
                }
                None => tracing::debug!("Ignoring unknown browser '{}'", name),
            }
        }

        if selected.is_empty() {
            return Err(Error::NoValidBrowsers);
        }

        Ok(selected)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::installed()
    }
}
