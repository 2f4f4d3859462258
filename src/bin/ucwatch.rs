//! Update watcher CLI.
//!
//! Subcommands map to the two external check triggers plus a connectivity
//! probe:
//! - `check` (default): user-initiated check; an up-to-date browser is
//!   confirmed with an alert in the active page
//! - `startup`: check only; stays silent in the browser unless a new release
//!   is found
//! - `doctor`: probes the DevTools endpoint and the release feed
//!
//! Tracing goes to stderr so stdout carries only the one-line result.

use std::sync::Arc;
use ucwatch::{BrowserHost, CheckOutcome, DevtoolsHost, UpdateChecker, WatchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ucwatch=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str).unwrap_or("check") {
        "check" => run_check(true).await,
        "startup" => run_check(false).await,
        "doctor" => run_doctor().await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow::anyhow!(
            "unknown subcommand `{other}` (use check|startup|doctor)"
        )),
    }
}

fn print_usage() {
    println!("ucwatch v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: ucwatch [check|startup|doctor]");
    println!();
    println!("  check    run an update check and confirm an up-to-date browser (default)");
    println!("  startup  run an update check, silent in the browser unless outdated");
    println!("  doctor   probe the DevTools endpoint and the release feed");
    println!();
    println!(
        "Configuration is read from {} when present.",
        WatchConfig::default_config_path().display()
    );
}

fn load_config() -> anyhow::Result<WatchConfig> {
    let path = WatchConfig::default_config_path();
    if path.exists() {
        tracing::debug!("loading config from {}", path.display());
        Ok(WatchConfig::from_file(&path)?)
    } else {
        Ok(WatchConfig::default())
    }
}

async fn run_check(announce_up_to_date: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let host = Arc::new(DevtoolsHost::new(&config.browser)?);

    // User-initiated checks read the version up front so the confirmation
    // alert does not depend on the check's own concurrent lookup.
    let local = if announce_up_to_date {
        Some(host.browser_version().await?)
    } else {
        None
    };

    let checker = UpdateChecker::new(config, host.clone())?;
    match checker.check_for_updates().await? {
        CheckOutcome::UpToDate => {
            if let Some(local) = local {
                ucwatch::notify::notify_up_to_date(host.as_ref(), &local).await;
            }
            println!("up to date");
        }
        CheckOutcome::Outdated {
            latest,
            download_url,
        } => {
            println!("update available: {latest} ({download_url})");
        }
    }
    Ok(())
}

async fn run_doctor() -> anyhow::Result<()> {
    let config = load_config()?;
    let mut failures = 0;

    match probe_devtools(&config).await {
        Ok(version) => println!("devtools: ok (browser {version})"),
        Err(e) => {
            failures += 1;
            println!("devtools: failed ({e})");
        }
    }

    match probe_feed(&config).await {
        Ok((title, version)) => println!("feed: ok (entry {title:?}, version {version})"),
        Err(e) => {
            failures += 1;
            println!("feed: failed ({e})");
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} probe(s) failed");
    }
    Ok(())
}

async fn probe_devtools(config: &WatchConfig) -> anyhow::Result<String> {
    let host = DevtoolsHost::new(&config.browser)?;
    Ok(host.browser_version().await?)
}

async fn probe_feed(config: &WatchConfig) -> anyhow::Result<(String, String)> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.feed.timeout_secs))
        .build()?;
    let body = client
        .get(&config.feed.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let entry = ucwatch::feed::select_release(&body, &config.feed.platform_marker)?;
    let version = ucwatch::version::extract_version(&entry.title);
    Ok((entry.title, version))
}
