//! Logging setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Level used when neither `--verbose` nor `RUST_LOG` is set.
const DEFAULT_LEVEL: &str = "warn";

/// Install a stderr subscriber. `--verbose` forces `debug`; otherwise
/// `RUST_LOG` applies, falling back to `warn`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
