//! Browser host abstraction.
//!
//! The update checker talks to the running browser through this trait. The
//! production implementation drives a Chromium over its DevTools endpoint
//! ([`crate::devtools::DevtoolsHost`]); tests substitute recording mocks.

use crate::error::Result;
use async_trait::async_trait;

/// Handle to one open browser page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    /// DevTools target id.
    pub id: String,
    /// URL the page is showing.
    pub url: String,
    /// Per-page debugger socket URL. Absent on targets that do not accept
    /// debugger attachment.
    pub socket_url: Option<String>,
}

/// Browser host contract: the four capabilities an update check consumes.
///
/// Error kinds are part of the contract: `browser_version` failures are
/// [`crate::WatchError::Transport`] (the check cannot proceed without a local
/// version), while page and alert failures are
/// [`crate::WatchError::Notification`] (the notifier downgrades them to
/// warnings).
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Full version string of the running build, e.g. `119.0.6045.123`.
    async fn browser_version(&self) -> Result<String>;

    /// Open `url` in a new page and return its handle.
    async fn open_page(&self, url: &str) -> Result<PageHandle>;

    /// Handle of the currently active page.
    async fn active_page(&self) -> Result<PageHandle>;

    /// Display a blocking text alert inside the given page.
    async fn show_alert(&self, page: &PageHandle, message: &str) -> Result<()>;
}
