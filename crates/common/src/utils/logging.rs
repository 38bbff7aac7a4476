use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives: session reconciliation is chatty at debug, HTTP
/// plumbing stays at warn unless `RUST_LOG` asks for more.
const DEFAULT_FILTER: &str = "info,service::session=debug,reqwest=warn,hyper_util=warn";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize a compact human-readable subscriber on stderr.
/// - Respects `RUST_LOG` if set
/// - Falls back to [`DEFAULT_FILTER`]
/// - stdout is left to command output of the `portal` binary
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize a JSON subscriber for machine-readable logs.
/// - Respects `RUST_LOG` if set, otherwise [`DEFAULT_FILTER`]
/// - Keeps targets so `service::session` events can be filtered downstream
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}

/// Pick the subscriber from a `PORTAL_LOG_FORMAT`-style value (`json` or anything else).
pub fn init_logging_from_format(format: &str) {
    if format.eq_ignore_ascii_case("json") {
        init_logging_json();
    } else {
        init_logging_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging_default();
        init_logging_json();
        init_logging_from_format("json");
        tracing::info!(event = "logger_test", "second init is a no-op");
    }
}
