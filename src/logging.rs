//! Tracing setup for the `hearth` binary
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests that want to see the output).

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber exactly once.
///
/// `RUST_LOG` wins when set; otherwise events from this crate are shown at
/// `default_level` and everything else at `warn`.
pub fn init_tracing(default_level: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,hearth_budget={}", default_level)));

        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}
