// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between `debug` and
/// `info` for this crate while keeping HTTP/HTML dependencies at `warn`.
pub fn setup_logging(verbose: bool) {
    let default_directive = if verbose {
        "fha_extractor=debug,warn"
    } else {
        "fha_extractor=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging initialised (default filter: {})", default_directive);
}
