// src/logging.rs
//! Diagnostic logging setup for the `linkeval` binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when `RUST_LOG` is unset: `info` by default, `-v` for
/// `debug`, `-vv` and above for `trace`.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "linkeval_core=info,linkeval=info,warn",
        1 => "linkeval_core=debug,linkeval=debug,warn",
        _ => "linkeval_core=trace,linkeval=trace,info",
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
