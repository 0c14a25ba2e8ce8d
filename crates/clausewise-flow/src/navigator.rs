//! Full-page navigation to the sibling application.

use anyhow::{Context, Result};

/// Leaves the orchestrator for an external URL.
pub trait Navigator: Send + Sync {
    /// # Errors
    /// Returns an error if the navigation could not be started.
    fn navigate(&self, url: &str) -> Result<()>;
}

/// Opens the URL in the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!(url, "opening browser");
        open::that(url).with_context(|| format!("open {url}"))
    }
}
