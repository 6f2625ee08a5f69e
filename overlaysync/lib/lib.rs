//! `overlaysync` flattens the upper layer of an overlay mount into its lower layer.
//!
//! # Overview
//!
//! An overlay mount presents a merged view of a read-only lower layer and a writable upper layer.
//! Once the mount is no longer needed, the changes recorded in the upper layer can be written
//! back into the lower layer so that it alone holds the merged view. overlaysync does that with a
//! single top-down walk of the upper layer:
//!
//! - new and changed files are copied over the lower layer
//! - directories are created, merged, or reset when marked opaque (`trusted.overlay.opaque=y`)
//! - whiteouts (character devices) delete the name they cover from the lower layer
//! - type changes between the layers replace the lower entry outright
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use overlaysync::{DecisionLog, OverlaySyncer};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Preview what a sync would do
//!     let plan = DecisionLog::new();
//!     let mut syncer = OverlaySyncer::new("/sandbox/lower", "/sandbox/upper")?
//!         .with_observer(plan.clone());
//!     syncer.set_dry_run(true);
//!     syncer.sync()?;
//!     println!("{} decisions", plan.decisions().len());
//!
//!     // Apply it
//!     syncer.set_dry_run(false);
//!     syncer.sync()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Caveats
//!
//! The upper layer must not change while a sync runs. A sync is not atomic: if it fails part way,
//! the lower layer keeps every change applied before the failure.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layer roots and run configuration
//! - [`syncer`] - The reconciliation walk and its observers
//! - [`utils`] - Filesystem helpers

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod syncer;
pub mod utils;

pub use error::*;
pub use syncer::{DecisionLog, OverlaySyncer};
