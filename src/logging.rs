use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber. Filtering follows `RUST_LOG`, defaulting to
/// `info` when it is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }
}
