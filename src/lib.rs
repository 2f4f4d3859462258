//! ucwatch: update watcher for Ungoogled Chromium.
//!
//! Checks whether the locally running browser build matches the latest entry
//! in the published release feed and notifies through the browser itself.
//!
//! # Architecture
//!
//! One check runs four steps:
//! - **Fetch**: the release feed and the running build's version are read
//!   concurrently (feed over HTTP, version from the DevTools endpoint)
//! - **Select**: the feed is parsed once into entry records and the first
//!   entry carrying the platform marker is chosen
//! - **Compare**: the dotted-quad version extracted from the entry title is
//!   compared against the local version by exact string equality
//! - **Notify**: an outdated build opens the download page and announces the
//!   release there; an up-to-date result is announced by the caller, if at all
//!
//! All browser interaction goes through the [`host::BrowserHost`] trait;
//! [`devtools::DevtoolsHost`] implements it over Chromium's remote-debugging
//! protocol.

pub mod checker;
pub mod config;
pub mod devtools;
pub mod error;
pub mod feed;
pub mod host;
pub mod notify;
pub mod version;

pub use checker::{CheckOutcome, UpdateChecker};
pub use config::WatchConfig;
pub use devtools::DevtoolsHost;
pub use error::{Result, WatchError};
pub use feed::ReleaseEntry;
pub use host::{BrowserHost, PageHandle};
