use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG`. `debug` raises the fallback
/// level from `warn` to `debug`.
pub fn init(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
