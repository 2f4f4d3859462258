//! Error types for the update watcher.

/// Top-level error type for the update check pipeline.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Feed fetch or local version lookup failure (network, browser endpoint).
    /// Fatal for the current check; never retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// The feed document has no entry for the platform marker, or the matched
    /// entry is missing its title or download link.
    #[error("feed format error: {0}")]
    FeedFormat(String),

    /// A page-open, active-page, or in-page alert request failed. Produced by
    /// browser host backends; the notifier downgrades this to a warning.
    #[error("notification error: {0}")]
    Notification(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WatchError>;
