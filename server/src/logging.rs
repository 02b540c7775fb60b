/// Install the global `tracing` subscriber.
///
/// Filtering comes from `RUST_LOG` (for example `RUST_LOG=pokescout_server=debug`)
/// and falls back to `info` when it is unset or invalid.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
