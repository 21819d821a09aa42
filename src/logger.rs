//! Tracing subscriber setup.

pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

const DEFAULT_FILTER: &str = "info";

/// Span close events (with their timings) are only shown at debug verbosity.
fn span_events(filter: &EnvFilter) -> FmtSpan {
    let directives = filter.to_string();
    if directives.contains("debug") || directives.contains("trace") {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Installs the global subscriber, filtering with `RUST_LOG` or else
/// `default_filter`. A second call is a no-op.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events(&env_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
