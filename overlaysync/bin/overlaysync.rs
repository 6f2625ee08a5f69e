//! `overlaysync` writes the upper layer of an overlay mount back into its lower layer.
//!
//! ## Usage
//!
//! ```bash
//! overlaysync [--dry-run] [--quiet] <LOWER> <UPPER>
//! ```
//!
//! Every decision is logged at debug level. Set `RUST_LOG` to override the default filter.

use clap::Parser;
use overlaysync::{
    cli::OverlaySyncArgs,
    config::{LayerPair, SyncOptions},
    OverlaySyncer,
};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = OverlaySyncArgs::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

fn run(args: &OverlaySyncArgs) -> anyhow::Result<()> {
    let layers = LayerPair::new(&args.lower, &args.upper)?;
    let options = SyncOptions::builder().dry_run(args.dry_run).build();

    OverlaySyncer::with_options(layers, options).sync()?;

    Ok(())
}
