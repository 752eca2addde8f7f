use anyhow::{Context, Result};
use clap::Parser;
use packed_bool_bench::bench;
use packed_bool_bench::config::{Config, Opt};
use tracing::info;

fn main() -> Result<()> {
    packed_bool_bench::logging::init();
    #[cfg(feature = "panic_handler")]
    packed_bool_bench::panic::set_panic_handler();

    let config = Config::from(Opt::parse());
    info!(
        item_count = config.item_count,
        access_count = config.access_count,
        seed = ?config.seed,
        "running benchmark"
    );

    bench::run_all(&config).context("benchmark aborted")?;
    Ok(())
}
