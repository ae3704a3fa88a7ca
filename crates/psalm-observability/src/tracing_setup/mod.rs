//! Tracing setup: subscriber initialization, span definitions, and event types.

pub mod events;
pub mod spans;

use std::sync::Once;

use psalm_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable read for per-target log filters.
pub const LOG_ENV_VAR: &str = "PSALM_LOG";

static INIT: Once = Once::new();

/// Initialize the global subscriber.
///
/// `PSALM_LOG` wins when set and valid, e.g. `PSALM_LOG=psalm_index=debug,info`.
/// Otherwise `config.log_level` applies. Idempotent; a subscriber installed
/// elsewhere first is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        let registry = tracing_subscriber::registry().with(filter);
        let _ = if config.json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .try_init()
        };
    });
}

/// Initialize tracing with an explicit filter string (tests, embedding hosts).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init();
}
