use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Installs the global subscriber. Log lines go to stderr so stdout only
/// carries the benchmark report. `RUST_LOG` overrides the default `warn` level.
pub fn init() {
    let registry = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::WARN.into())
                    .from_env_lossy(),
            ),
    );

    if tracing::dispatcher::set_global_default(registry.into()).is_err() {
        eprintln!("global tracing subscriber already set, keeping it");
    }
}
