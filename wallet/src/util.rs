use anyhow::Result;
use std::io;
use std::panic;
use tracing::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize tracing with compact format and environment-based filtering.
/// Logs go to stderr; stdout is reserved for the result line.
pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact().with_writer(io::stderr);

    // RUST_LOG wins, otherwise "info"
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Make sure tracing is able to log panics occurring in the generator
pub fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        error!("Application panicked!");
        error!("Panic info: {:?}", panic_info);
        error!("Backtrace: {:?}", backtrace);
    }));
}
