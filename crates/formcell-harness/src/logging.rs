#![forbid(unsafe_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INIT: Once = Once::new();

/// Install a `fmt` subscriber writing through the test harness.
///
/// Verbosity comes from `RUST_LOG` (default `warn`). Safe to call from every
/// test; only the first call installs anything, and an already-installed
/// global subscriber is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .with(filter)
            .try_init();
    });
}
