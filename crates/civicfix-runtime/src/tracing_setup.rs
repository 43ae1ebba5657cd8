//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use civicfix_core::config::ObservabilityConfig;

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `CIVICFIX_LOG=civicfix_indexer=debug,civicfix_storage=warn`.
pub const LOG_ENV: &str = "CIVICFIX_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// `CIVICFIX_LOG` wins over `observability.log_filter`. Idempotent; if some
/// other subscriber is already installed it is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = ObservabilityConfig {
            json: false,
            ..ObservabilityConfig::default()
        };
        init_tracing(&config);
        init_tracing(&ObservabilityConfig::default());
        tracing::info!("still logging");
    }
}
