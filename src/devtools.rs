//! DevTools browser host backend.
//!
//! Drives a running Chromium build through its remote-debugging surface: the
//! JSON endpoints for version lookup, page creation, and target listing, plus
//! a single `Runtime.evaluate` call over a page's debugger WebSocket for the
//! alert. The browser must be started with `--remote-debugging-port` for the
//! endpoint to exist.

use crate::config::BrowserConfig;
use crate::error::{Result, WatchError};
use crate::host::{BrowserHost, PageHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command id for the one evaluate call sent per debugger connection.
const EVALUATE_ID: u64 = 1;

/// Browser host backed by the Chromium remote-debugging protocol.
#[derive(Debug, Clone)]
pub struct DevtoolsHost {
    client: reqwest::Client,
    base_url: String,
    alert_grace: Duration,
}

impl DevtoolsHost {
    /// Create a host for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] when the configured host and port do not
    /// form a valid URL or the HTTP client cannot be built.
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let base_url = format!("http://{}:{}", config.devtools_host, config.devtools_port);
        url::Url::parse(&base_url).map_err(|e| {
            WatchError::Config(format!("invalid devtools endpoint {base_url:?}: {e}"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ucwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WatchError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            alert_grace: Duration::from_millis(config.alert_grace_ms),
        })
    }

    /// Set the base URL (useful for testing with mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_version_info(&self) -> Result<VersionInfo> {
        let endpoint = format!("{}/json/version", self.base_url);
        self.client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| WatchError::Transport(format!("devtools version request failed: {e}")))?
            .error_for_status()
            .map_err(|e| WatchError::Transport(format!("devtools version request failed: {e}")))?
            .json()
            .await
            .map_err(|e| WatchError::Transport(format!("devtools version reply malformed: {e}")))
    }

    async fn evaluate_alert(&self, socket_url: &str, message: &str) -> Result<()> {
        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::{connect_async, tungstenite::Message};

        let (ws_stream, _) = connect_async(socket_url)
            .await
            .map_err(|e| WatchError::Notification(format!("debugger connect failed: {e}")))?;
        let (mut write, mut read) = ws_stream.split();

        let command = EvaluateCommand {
            id: EVALUATE_ID,
            method: "Runtime.evaluate",
            params: EvaluateParams {
                expression: alert_expression(message)?,
                user_gesture: true,
            },
        };
        let json = serde_json::to_string(&command)
            .map_err(|e| WatchError::Notification(format!("encode evaluate command: {e}")))?;
        write
            .send(Message::Text(json))
            .await
            .map_err(|e| WatchError::Notification(format!("send evaluate command: {e}")))?;

        // alert() blocks the evaluated script, so a displayed dialog holds the
        // reply back until the user dismisses it. A rejection arrives quickly;
        // silence through the grace period means the dialog is showing.
        let deadline = tokio::time::sleep(self.alert_grace);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => return Ok(()),
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(outcome) = reply_outcome(&text) {
                            return outcome;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(WatchError::Notification(
                            "debugger closed before acknowledging alert".to_string(),
                        ));
                    }
                    Some(Err(e)) => {
                        return Err(WatchError::Notification(format!("debugger read error: {e}")));
                    }
                    _ => {} // Binary, Ping/Pong frames handled by tungstenite.
                },
            }
        }
    }
}

#[async_trait]
impl BrowserHost for DevtoolsHost {
    async fn browser_version(&self) -> Result<String> {
        let info = self.fetch_version_info().await?;
        let Some(browser) = info.browser else {
            return Err(WatchError::Transport(
                "devtools version reply has no Browser field".to_string(),
            ));
        };
        let version = version_from_product(&browser);
        if version.is_empty() {
            return Err(WatchError::Transport(format!(
                "devtools Browser field {browser:?} carries no version"
            )));
        }
        Ok(version.to_string())
    }

    async fn open_page(&self, url: &str) -> Result<PageHandle> {
        // The endpoint takes the raw target URL after the `?`, not an encoded
        // query parameter.
        let endpoint = format!("{}/json/new?{url}", self.base_url);
        let target: TargetInfo = self
            .client
            .put(&endpoint)
            .send()
            .await
            .map_err(|e| WatchError::Notification(format!("open page request failed: {e}")))?
            .error_for_status()
            .map_err(|e| WatchError::Notification(format!("open page request failed: {e}")))?
            .json()
            .await
            .map_err(|e| WatchError::Notification(format!("open page reply malformed: {e}")))?;
        tracing::debug!("opened page {} for {url}", target.id);
        Ok(target.into_handle())
    }

    async fn active_page(&self) -> Result<PageHandle> {
        let endpoint = format!("{}/json/list", self.base_url);
        let targets: Vec<TargetInfo> = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| WatchError::Notification(format!("target list request failed: {e}")))?
            .error_for_status()
            .map_err(|e| WatchError::Notification(format!("target list request failed: {e}")))?
            .json()
            .await
            .map_err(|e| WatchError::Notification(format!("target list reply malformed: {e}")))?;
        targets
            .into_iter()
            .find(|target| target.kind == "page")
            .map(TargetInfo::into_handle)
            .ok_or_else(|| WatchError::Notification("no open page target".to_string()))
    }

    async fn show_alert(&self, page: &PageHandle, message: &str) -> Result<()> {
        let Some(socket_url) = page.socket_url.as_deref() else {
            return Err(WatchError::Notification(format!(
                "page {} exposes no debugger socket",
                page.url
            )));
        };
        self.evaluate_alert(socket_url, message).await
    }
}

/// Version component of a `Browser` product string such as
/// `Chrome/119.0.6045.123` or `HeadlessChrome/119.0.6045.123`.
fn version_from_product(browser: &str) -> &str {
    browser.rsplit('/').next().unwrap_or(browser).trim()
}

/// Builds the evaluate expression, escaping the message as a JSON string
/// literal so quotes and newlines survive into the page.
fn alert_expression(message: &str) -> Result<String> {
    let literal = serde_json::to_string(message)
        .map_err(|e| WatchError::Notification(format!("encode alert message: {e}")))?;
    Ok(format!("alert({literal})"))
}

/// Classifies one debugger frame: `Some` for our command's reply, `None` for
/// protocol events and unrelated frames.
fn reply_outcome(text: &str) -> Option<Result<()>> {
    let reply: EvaluateReply = serde_json::from_str(text).ok()?;
    if reply.id != Some(EVALUATE_ID) {
        return None;
    }
    if let Some(error) = reply.error {
        return Some(Err(WatchError::Notification(format!(
            "alert evaluation rejected: {} (code {})",
            error.message, error.code
        ))));
    }
    if let Some(result) = reply.result
        && result.exception_details.is_some()
    {
        return Some(Err(WatchError::Notification(
            "alert evaluation threw in the page".to_string(),
        )));
    }
    Some(Ok(()))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Reply to `GET /json/version`.
#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "Browser")]
    browser: Option<String>,
}

/// One target of `GET /json/list`; also the reply shape of `PUT /json/new`.
#[derive(Debug, Deserialize)]
struct TargetInfo {
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    socket_url: Option<String>,
}

impl TargetInfo {
    fn into_handle(self) -> PageHandle {
        PageHandle {
            id: self.id,
            url: self.url,
            socket_url: self.socket_url,
        }
    }
}

/// `Runtime.evaluate` command frame.
#[derive(Debug, Serialize)]
struct EvaluateCommand {
    id: u64,
    method: &'static str,
    params: EvaluateParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateParams {
    expression: String,
    user_gesture: bool,
}

/// Command reply frame. Event frames carry no `id` member.
#[derive(Debug, Deserialize)]
struct EvaluateReply {
    id: Option<u64>,
    error: Option<ProtocolError>,
    result: Option<EvaluateResult>,
}

#[derive(Debug, Deserialize)]
struct ProtocolError {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResult {
    exception_details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn version_strips_product_prefix() {
        assert_eq!(version_from_product("Chrome/119.0.6045.123"), "119.0.6045.123");
        assert_eq!(
            version_from_product("HeadlessChrome/120.0.6099.5"),
            "120.0.6099.5"
        );
    }

    #[test]
    fn version_without_prefix_passes_through() {
        assert_eq!(version_from_product("119.0.6045.123"), "119.0.6045.123");
        assert_eq!(version_from_product(""), "");
    }

    #[test]
    fn alert_expression_escapes_message() {
        let expr = alert_expression("line one\nline \"two\"").unwrap();
        assert_eq!(expr, r#"alert("line one\nline \"two\"")"#);
    }

    #[test]
    fn evaluate_command_serializes_camel_case() {
        let command = EvaluateCommand {
            id: EVALUATE_ID,
            method: "Runtime.evaluate",
            params: EvaluateParams {
                expression: "alert(\"hi\")".to_string(),
                user_gesture: true,
            },
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains(r#""method":"Runtime.evaluate""#));
        assert!(json.contains(r#""userGesture":true"#));
    }

    #[test]
    fn target_info_reads_devtools_shape() {
        let json = r#"{
            "description": "",
            "id": "DAB7FB6187B554E10B0BD18821265734",
            "title": "New Tab",
            "type": "page",
            "url": "chrome://newtab/",
            "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/DAB7FB6187B554E10B0BD18821265734"
        }"#;
        let target: TargetInfo = serde_json::from_str(json).unwrap();
        let handle = target.into_handle();
        assert_eq!(handle.id, "DAB7FB6187B554E10B0BD18821265734");
        assert_eq!(handle.url, "chrome://newtab/");
        assert!(handle.socket_url.is_some());
    }

    #[test]
    fn target_without_socket_yields_none() {
        let json = r#"{"id": "abc", "type": "page", "url": "chrome://settings/"}"#;
        let target: TargetInfo = serde_json::from_str(json).unwrap();
        assert!(target.into_handle().socket_url.is_none());
    }

    #[test]
    fn reply_outcome_accepts_clean_reply() {
        let outcome = reply_outcome(r#"{"id":1,"result":{"result":{"type":"undefined"}}}"#);
        assert!(matches!(outcome, Some(Ok(()))));
    }

    #[test]
    fn reply_outcome_rejects_protocol_error() {
        let outcome =
            reply_outcome(r#"{"id":1,"error":{"code":-32000,"message":"Target closed"}}"#);
        match outcome {
            Some(Err(WatchError::Notification(msg))) => assert!(msg.contains("Target closed")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn reply_outcome_rejects_page_exception() {
        let outcome = reply_outcome(
            r#"{"id":1,"result":{"result":{"type":"object"},"exceptionDetails":{"text":"Uncaught"}}}"#,
        );
        assert!(matches!(outcome, Some(Err(WatchError::Notification(_)))));
    }

    #[test]
    fn reply_outcome_skips_events_and_other_ids() {
        assert!(reply_outcome(r#"{"method":"Runtime.consoleAPICalled","params":{}}"#).is_none());
        assert!(reply_outcome(r#"{"id":7,"result":{}}"#).is_none());
        assert!(reply_outcome("not json").is_none());
    }
}
