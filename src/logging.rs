//! Diagnostic logging setup.
//!
//! Logs go to stderr so the transcript on stdout stays clean. `RUST_LOG`
//! takes precedence over the level chosen by the command-line flags.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default level for the given verbosity flag.
pub fn default_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

/// Install the global subscriber. Later calls are ignored.
///
/// * `verbose` - log at debug level when `RUST_LOG` is unset
/// * `json` - emit newline-delimited JSON instead of text
pub fn init_tracing(verbose: bool, json: bool) {
    let level = default_level(verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
