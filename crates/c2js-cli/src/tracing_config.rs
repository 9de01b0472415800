//! Installs the global `tracing` subscriber once, per the ambient-stack
//! decision in SPEC_FULL.md §1.1: `-v`/`-vv` raise the default level,
//! `RUST_LOG` always wins when set.

use tracing_subscriber::EnvFilter;

pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "c2js=info",
        1 => "c2js=debug",
        _ => "c2js=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
