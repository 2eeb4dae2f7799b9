//! Process-wide tracing subscriber
//!
//! Library code only emits `tracing` events; binaries call [`init`] once at
//! startup to decide where they go.

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`) is
/// used. Calling this twice is an error reported by the subscriber registry.
pub fn init(default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{default_directive}': {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
