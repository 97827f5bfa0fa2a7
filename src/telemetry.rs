use tracing_subscriber::EnvFilter;

/// Installs the process-wide structured log sink. Called exactly once at
/// startup; `RUST_LOG` overrides the default level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
