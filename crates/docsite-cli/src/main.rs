//! `docsite` command line entry point

mod docs;

use anyhow::Result;
use std::env;

fn main() -> Result<()> {
    // DOCSITE_LOG configures the log level, default "info"
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("DOCSITE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    docs::run(&args)
}
