// Logs go to stderr. The terminal window owns the screen, so it stays silent
// unless verbose logging or RUST_LOG was asked for.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Picks the subscriber filters. A `RUST_LOG` directive replaces the crate
/// target filter entirely so it can switch on output the defaults keep off.
fn filters(verbose: bool, interactive: bool, rust_log: Option<&str>) -> (Option<Targets>, EnvFilter) {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(env_filter) = EnvFilter::try_new(directives) {
            return (None, env_filter);
        }
    }

    let (level_filter, level) = match (verbose, interactive) {
        (true, _) => (LevelFilter::DEBUG, "debug"),
        (false, true) => (LevelFilter::OFF, "off"),
        (false, false) => (LevelFilter::INFO, "info"),
    };
    let app_filter = Targets::new()
        .with_target("fxdesk", level_filter)
        .with_target("tower_http", level_filter);
    (Some(app_filter), EnvFilter::new(level))
}

pub fn init_logging(verbose: bool, interactive: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (app_filter, env_filter) = filters(verbose, interactive, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}
