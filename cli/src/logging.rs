use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes console logging.
///
/// Logs go to stderr so the confirmation output on stdout stays readable.
/// Default level is "info" with the deletion service at "debug"; override with
/// RUST_LOG, for example:
/// - RUST_LOG=warn bulk-delete fixture.json
/// - RUST_LOG=deletion_service=trace bulk-delete fixture.json
pub fn init_logging() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,deletion_service=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
