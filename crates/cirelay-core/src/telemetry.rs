//! Tracing initialisation for cirelay binaries.
//!
//! Filtering is taken from `CIRELAY_LOG`, then `RUST_LOG`, and otherwise
//! defaults to the requested level for cirelay's own crates with everything
//! else (hyper, reqwest, axum) held at `warn`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "CIRELAY_LOG";

const CIRELAY_TARGETS: [&str; 3] = ["cirelay_core", "cirelay_discord", "cirelayd"];

/// Filter used when neither `CIRELAY_LOG` nor `RUST_LOG` is set.
pub fn default_filter(level: Level) -> EnvFilter {
    let directives = CIRELAY_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level.as_str().to_ascii_lowercase()))
        .fold("warn".to_string(), |acc, directive| acc + "," + &directive);
    EnvFilter::new(directives)
}

/// Install the global subscriber; `json` switches to newline-delimited JSON.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| default_filter(level));

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(false);
    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
