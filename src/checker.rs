//! Update check orchestration.
//!
//! One check reads the release feed and the running browser's version
//! concurrently, parses once, compares once. At most one notification
//! follows. Checks are stateless and independent; overlapping invocations
//! are neither deduplicated nor serialized.

use crate::config::WatchConfig;
use crate::error::{Result, WatchError};
use crate::feed::select_release;
use crate::host::BrowserHost;
use crate::notify;
use crate::version::{extract_version, is_up_to_date};
use std::sync::Arc;
use std::time::Duration;

/// Result of one update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The running build matches the latest published release.
    UpToDate,
    /// A newer (or at least different) release is published.
    Outdated {
        /// Version extracted from the matching feed entry.
        latest: String,
        /// Download page the entry links to.
        download_url: String,
    },
}

impl CheckOutcome {
    /// True when the running build matches the latest release.
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, CheckOutcome::UpToDate)
    }
}

/// Orchestrates update checks against one feed and one browser host.
pub struct UpdateChecker {
    config: WatchConfig,
    client: reqwest::Client,
    host: Arc<dyn BrowserHost>,
}

impl std::fmt::Debug for UpdateChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateChecker")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl UpdateChecker {
    /// Create a checker from configuration and a browser host.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] when the feed URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(config: WatchConfig, host: Arc<dyn BrowserHost>) -> Result<Self> {
        url::Url::parse(&config.feed.url).map_err(|e| {
            WatchError::Config(format!("invalid feed url {:?}: {e}", config.feed.url))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.feed.timeout_secs))
            .user_agent(concat!("ucwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WatchError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            host,
        })
    }

    /// Run one complete check.
    ///
    /// Fetches the feed and the local version concurrently, selects the
    /// platform's release entry, and compares versions. An outdated result
    /// triggers the outdated notification (download page plus alert) before
    /// returning; an up-to-date result returns without notifying, leaving any
    /// confirmation to the caller, which may already hold the local version.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Transport`] when either read fails and
    /// [`WatchError::FeedFormat`] when the feed has no usable entry.
    /// Notification failures are downgraded to warnings and never surface
    /// here.
    pub async fn check_for_updates(&self) -> Result<CheckOutcome> {
        let (feed, local) = tokio::join!(self.fetch_feed(), self.host.browser_version());
        let feed = feed?;
        let local = local?;

        let release = select_release(&feed, &self.config.feed.platform_marker)?;
        let latest = extract_version(&release.title);

        if is_up_to_date(&local, &latest) {
            tracing::info!("browser is up to date at {local}");
            return Ok(CheckOutcome::UpToDate);
        }

        tracing::info!("release {latest} available, running {local}");
        notify::notify_outdated(self.host.as_ref(), &local, &latest, &release.download_url).await;
        Ok(CheckOutcome::Outdated {
            latest,
            download_url: release.download_url,
        })
    }

    async fn fetch_feed(&self) -> Result<String> {
        self.client
            .get(&self.config.feed.url)
            .send()
            .await
            .map_err(|e| WatchError::Transport(format!("feed fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| WatchError::Transport(format!("feed fetch failed: {e}")))?
            .text()
            .await
            .map_err(|e| WatchError::Transport(format!("feed body unreadable: {e}")))
    }
}
