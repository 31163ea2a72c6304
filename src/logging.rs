//! Logging setup for the binaries.
//!
//! Installs a global `tracing` subscriber writing to stderr. `RUST_LOG`
//! overrides the default filter.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing. The default level is `info` for this crate, or
/// `debug` when `verbose` is set.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "wristfeat=debug" } else { "wristfeat=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
