use tracing_subscriber::EnvFilter;

/// Initializes `tracing` the same way across all four binaries: `RUST_LOG`
/// wins when set, otherwise fall back to `default_level` with noisy
/// transport crates turned down to `info`.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{default_level},hyper=info,reqwest=info,h2=info"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(true)
        .try_init();
}
