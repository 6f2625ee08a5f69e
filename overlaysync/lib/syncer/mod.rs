//! Reconciliation of an overlay upper layer into its lower layer.
//!
//! The upper layer is walked top-down. Each entry is handed to a reconciler picked by its type:
//!
//! - directories are created, replaced, emptied (when marked opaque) or merged
//! - character devices are whiteouts and delete their lower counterpart
//! - symbolic links are recreated as links
//! - everything else is copied over its lower counterpart
//!
//! Every decision is reported to a [`SyncObserver`] before it is applied. Dry runs report
//! decisions without applying any of them, and each one is taken against the unchanged lower layer.
//! Under an opaque directory a dry run can therefore report replacements that a real run skips,
//! because the real run has already emptied that directory.

mod dir;
mod file;
mod observer;
mod opaque;
mod syncer;
mod walk;
mod whiteout;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use observer::*;
pub use opaque::{is_opaque_dir, OVERLAY_OPAQUE_XATTR};
pub use syncer::*;
pub use walk::*;

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
