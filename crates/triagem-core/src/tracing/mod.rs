//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Triagem tracing/logging system.
///
/// Reads the `TRIAGEM_LOG` environment variable for per-subsystem log
/// levels, e.g. `TRIAGEM_LOG=triagem_engine=debug,triagem_core=info`.
///
/// Falls back to `triagem=info` if `TRIAGEM_LOG` is not set or is invalid.
///
/// This function is idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TRIAGEM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("triagem=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();

        ::tracing::debug!(version = crate::constants::VERSION, "tracing initialized");
    });
}
