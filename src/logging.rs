//! tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServeMode;

static INIT: Once = Once::new();

/// Installs the global subscriber. Only the first call has any effect.
///
/// Lambda mode writes flattened JSON lines for CloudWatch; http mode writes
/// compact human-readable lines. `RUST_LOG` overrides the default `info`.
pub fn init_logging(mode: ServeMode) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match mode {
            ServeMode::Lambda => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .flatten_event(true)
                        .with_current_span(false)
                        // CloudWatch stamps every line already.
                        .without_time(),
                )
                .try_init(),
            ServeMode::Http => registry
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init(),
        };

        if let Err(e) = result {
            eprintln!("failed to install tracing subscriber: {}", e);
        }
    });
}
