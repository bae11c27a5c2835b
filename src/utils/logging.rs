use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber used by both binaries.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Stdout stays
/// reserved for the session protocol.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
