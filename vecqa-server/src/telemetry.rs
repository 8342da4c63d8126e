use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Environment;

/// Installs the global subscriber: JSON lines in production, human-readable
/// text otherwise. `RUST_LOG` overrides the default `info` filter.
///
/// Calling this more than once is a no-op.
pub fn init_tracing(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true).compact())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => tracing::info!(?environment, "tracing initialized"),
        Err(_) => tracing::debug!("tracing already initialized"),
    }
}
