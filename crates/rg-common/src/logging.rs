//! Structured Logging Configuration
//!
//! One initialization entry point for every Rolegate process:
//! human-readable text output for development (the default) and JSON for
//! production log aggregation.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: set to "json" for JSON output, anything else for text
//! - `RUST_LOG`: standard level filter (default: info),
//!   e.g. `RUST_LOG=rg_iam=debug`

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the global tracing subscriber.
///
/// Panics if a subscriber is already installed; use [`try_init_logging`]
/// from tests or embedders that may initialize more than once.
pub fn init_logging() {
    if json_requested() {
        init_json_logging(env_filter());
    } else {
        init_text_logging(env_filter());
    }
}

/// Like [`init_logging`] but keeps an already-installed subscriber.
pub fn try_init_logging() {
    let registry = tracing_subscriber::registry().with(env_filter());
    let result = if json_requested() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .try_init()
    };
    let _ = result;
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn json_requested() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// JSON logging for production log aggregation.
fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .flatten_event(true),
        )
        .init();
}

/// Human-readable text logging for development.
fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .init();
}
