//! Tracing initialization for the tracker binaries
//!
//! Logs go to stderr; stdout carries the rendered reports.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map `-v` repetitions to a level. Default is warn.
fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing/logging
///
/// - Environment-based filtering via RUST_LOG
/// - `crate_name`, `gh_tracker` and `github_api` default to the level picked by `verbose`
/// - `LOG_FORMAT=json` for structured JSON output
///
/// # Example
///
/// ```rust,ignore
/// gh_tracker::init_tracing("milestone_tracker", cli.verbose)?;
/// ```
pub fn init_tracing(crate_name: &str, verbose: u8) -> anyhow::Result<()> {
    let level = level_for(verbose);
    let mut filter = EnvFilter::from_default_env();
    for target in [crate_name, "gh_tracker", "github_api"] {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
