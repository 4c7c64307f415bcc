//! Tracing subscriber setup for the command-line tool.

use tracing_subscriber::EnvFilter;

/// Initialise the global [`tracing`] subscriber.
///
/// Events go to stderr so stdout stays reserved for command output.
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// with `verbose`.
pub fn init_subscriber(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Filter directive used when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(verbose: bool) -> String {
    format!("pygmy_resolv={}", if verbose { "debug" } else { "info" })
}
