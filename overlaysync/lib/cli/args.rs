use std::path::PathBuf;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Parser,
};

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// overlaysync flattens the upper layer of an overlay mount into its lower layer
#[derive(Debug, Parser)]
#[command(name = "overlaysync", author, about, version, styles=styles())]
pub struct OverlaySyncArgs {
    /// Lower layer root, updated in place
    #[arg(value_name = "LOWER")]
    pub lower: PathBuf,

    /// Upper layer root, read only
    #[arg(value_name = "UPPER")]
    pub upper: PathBuf,

    /// Report every decision without changing the lower layer
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only log the start and end of the sync instead of every decision
    #[arg(short, long)]
    pub quiet: bool,
}

//-------------------------------------------------------------------------------------------------
// Methods
//-------------------------------------------------------------------------------------------------

impl OverlaySyncArgs {
    /// Returns the log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            "overlaysync=info"
        } else {
            "overlaysync=debug"
        }
    }
}

//-------------------------------------------------------------------------------------------------
// Functions
//-------------------------------------------------------------------------------------------------

/// Help output colors shared by every command.
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

//-------------------------------------------------------------------------------------------------
// Tests
//-------------------------------------------------------------------------------------------------
