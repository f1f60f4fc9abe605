use crate::Environment;
use ::tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is not set in development.
const DEV_FILTER: &str = "info,domain_catalog=debug,database=debug,mongodb=warn";

/// Default filter when `RUST_LOG` is not set in production.
const PROD_FILTER: &str = "warn,domain_catalog=info,database=info";

/// Install color-eyre with the project-standard report layout.
///
/// Shows the `file:line` where a report was created and hides the
/// environment section. Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Build the filter used by [`init_tracing`], honouring `RUST_LOG` first.
pub fn env_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new(PROD_FILTER)
        } else {
            EnvFilter::new(DEV_FILTER)
        }
    })
}

/// Initialize the global subscriber.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events without
///   module targets, suited to log aggregation.
/// - **Development**: pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so span traces can be attached to
/// error reports. Repeated calls are ignored, which keeps tests that share a
/// process from panicking.
pub fn init_tracing(environment: &Environment) {
    let filter = env_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
