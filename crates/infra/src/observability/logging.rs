//! Log subscriber installation
//!
//! Everything in the workspace logs through `tracing`; binaries call
//! [`init`] once at startup to decide where those events go.

use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use vkclient_domain::LoggingConfig;

/// Install a stderr subscriber for `config`.
///
/// `RUST_LOG` takes precedence over `config.filter`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init(config: &LoggingConfig) -> bool {
    let layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> =
        vec![stderr_layer(config.json), Box::new(build_filter(config))];

    Registry::default().with(layers).try_init().is_ok()
}

/// Filter from `RUST_LOG`, falling back to the configured directives.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

fn stderr_layer(json: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    if json {
        Box::new(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
    } else {
        Box::new(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr).with_target(true))
    }
}
