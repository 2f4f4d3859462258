//! User-facing notification paths.
//!
//! Delivery is best effort: every host failure here is logged as a warning
//! and swallowed, so a restricted page (script evaluation is rejected on
//! chrome:// and similar internal pages) never changes a check's outcome.
//! The message texts are fixed; there is no localization.

use crate::host::BrowserHost;

/// Alert text announcing a newer release.
pub fn outdated_message(local: &str, latest: &str) -> String {
    format!(
        "Current Ungoogled Chromium Version: {local}\n\
         Latest Windows 64-bit x86 release: {latest}\n\n\
         Browser outdated. Please download the latest version."
    )
}

/// Alert text confirming the running build is current.
pub fn up_to_date_message(local: &str) -> String {
    format!("Current Ungoogled Chromium Version: {local}\n\nYour browser is up to date.")
}

/// Open the download page and announce the new release there.
pub async fn notify_outdated(host: &dyn BrowserHost, local: &str, latest: &str, download_url: &str) {
    let message = outdated_message(local, latest);
    let page = match host.open_page(download_url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("could not open download page {download_url}: {e}");
            return;
        }
    };
    if let Err(e) = host.show_alert(&page, &message).await {
        tracing::warn!("alert in download page failed: {e}");
    }
}

/// Announce an up-to-date browser in the currently active page.
///
/// Invoked by user-initiated checks only; startup checks stay silent when
/// nothing changed.
pub async fn notify_up_to_date(host: &dyn BrowserHost, local: &str) {
    let message = up_to_date_message(local);
    let page = match host.active_page().await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("could not find an active page: {e}");
            return;
        }
    };
    if let Err(e) = host.show_alert(&page, &message).await {
        tracing::warn!("alert injection failed, likely a restricted page: {e}");
    }
}
