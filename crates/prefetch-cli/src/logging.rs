use tracing_subscriber::EnvFilter;

/// Route diagnostics to stderr so stdout carries only records.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects info over warn.
pub fn init(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
