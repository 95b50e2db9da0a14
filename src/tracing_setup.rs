use eyre::Result;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::RunMode;

/// Initialize structured logging.
///
/// Production emits JSON for log shippers; development emits pretty
/// console output. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(mode: RunMode) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        RunMode::Production => {
            Registry::default()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(false)
                        .with_span_list(true)
                        .with_target(true),
                )
                .init();
        }
        RunMode::Development => {
            Registry::default()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    tracing::info!(?mode, "structured logging initialized");
    Ok(())
}
