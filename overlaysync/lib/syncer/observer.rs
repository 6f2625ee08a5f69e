use std::{cell::RefCell, path::PathBuf, rc::Rc};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A reconciliation decision taken for a single upper layer entry.
///
/// Decisions are reported before the corresponding mutation is applied, and are reported even
/// when the sync is a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The upper root itself is visited but never reconciled.
    SkipRoot {
        /// The upper layer root.
        upper: PathBuf,
    },

    /// A whiteout names a path that is already absent from the lower layer.
    WhiteoutAbsent {
        /// The whiteout marker.
        upper: PathBuf,
        /// The absent lower path.
        lower: PathBuf,
    },

    /// A whiteout deletes an existing lower path.
    DeleteWhiteout {
        /// The whiteout marker.
        upper: PathBuf,
        /// The lower path being deleted.
        lower: PathBuf,
    },

    /// A directory is created because the lower layer has nothing at its name.
    CreateDir {
        /// The upper directory.
        upper: PathBuf,
        /// The lower directory being created.
        lower: PathBuf,
    },

    /// A non-directory in the lower layer is replaced by a fresh directory.
    ReplaceWithDir {
        /// The upper directory.
        upper: PathBuf,
        /// The lower path being replaced.
        lower: PathBuf,
    },

    /// An opaque upper directory resets the children of its lower counterpart.
    EmptyOpaqueDir {
        /// The opaque upper directory.
        upper: PathBuf,
        /// The lower directory being emptied.
        lower: PathBuf,
    },

    /// A non-opaque upper directory merges into its existing lower counterpart.
    MergeDir {
        /// The upper directory.
        upper: PathBuf,
        /// The lower directory kept as is.
        lower: PathBuf,
    },

    /// A directory, symbolic link or special file in the lower layer is deleted so a regular file
    /// can take its name.
    ReplaceWithFile {
        /// The upper file.
        upper: PathBuf,
        /// The lower entry being deleted.
        lower: PathBuf,
    },

    /// An upper file is copied over its lower counterpart.
    CopyFile {
        /// The upper file.
        upper: PathBuf,
        /// The lower file being written.
        lower: PathBuf,
    },

    /// An upper symbolic link is recreated in the lower layer.
    CopySymlink {
        /// The upper symbolic link.
        upper: PathBuf,
        /// The lower symbolic link being written.
        lower: PathBuf,
        /// The link target, copied verbatim.
        target: PathBuf,
    },
}

/// Receives every decision a sync makes.
///
/// This is the logging capability handed to [`OverlaySyncer`](super::OverlaySyncer); the default
/// is [`TracingObserver`].
pub trait SyncObserver {
    /// Called once per decision, before any mutation for it.
    fn observe(&self, decision: &Decision, dry_run: bool);
}

/// Reports decisions as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

/// Collects decisions in memory.
///
/// Clones share the same log, so one clone can be handed to the syncer while another is kept to
/// inspect what was decided, e.g. the plan of a dry run.
///
/// A dry-run plan can differ from the real run under opaque directories: their children are still
/// compared against the lower entries that the real run would already have removed.
#[derive(Debug, Default, Clone)]
pub struct DecisionLog {
    decisions: Rc<RefCell<Vec<Decision>>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Decision {
    /// Short name of the decision, used as the `action` field in log events.
    pub fn action(&self) -> &'static str {
        match self {
            Decision::SkipRoot { .. } => "skip",
            Decision::WhiteoutAbsent { .. } => "whiteout-absent",
            Decision::DeleteWhiteout { .. } => "delete",
            Decision::CreateDir { .. } => "mkdir",
            Decision::ReplaceWithDir { .. } => "replace-with-dir",
            Decision::EmptyOpaqueDir { .. } => "empty",
            Decision::MergeDir { .. } => "merge",
            Decision::ReplaceWithFile { .. } => "replace-with-file",
            Decision::CopyFile { .. } => "copy",
            Decision::CopySymlink { .. } => "symlink",
        }
    }

    /// The upper layer path the decision was made for.
    pub fn upper(&self) -> &PathBuf {
        match self {
            Decision::SkipRoot { upper }
            | Decision::WhiteoutAbsent { upper, .. }
            | Decision::DeleteWhiteout { upper, .. }
            | Decision::CreateDir { upper, .. }
            | Decision::ReplaceWithDir { upper, .. }
            | Decision::EmptyOpaqueDir { upper, .. }
            | Decision::MergeDir { upper, .. }
            | Decision::ReplaceWithFile { upper, .. }
            | Decision::CopyFile { upper, .. }
            | Decision::CopySymlink { upper, .. } => upper,
        }
    }

    /// The lower layer path the decision applies to, if any.
    pub fn lower(&self) -> Option<&PathBuf> {
        match self {
            Decision::SkipRoot { .. } => None,
            Decision::WhiteoutAbsent { lower, .. }
            | Decision::DeleteWhiteout { lower, .. }
            | Decision::CreateDir { lower, .. }
            | Decision::ReplaceWithDir { lower, .. }
            | Decision::EmptyOpaqueDir { lower, .. }
            | Decision::MergeDir { lower, .. }
            | Decision::ReplaceWithFile { lower, .. }
            | Decision::CopyFile { lower, .. }
            | Decision::CopySymlink { lower, .. } => Some(lower),
        }
    }
}

impl DecisionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every decision recorded so far, in order.
    pub fn decisions(&self) -> Vec<Decision> {
        self.decisions.borrow().clone()
    }

    /// Returns the recorded actions, in order.
    pub fn actions(&self) -> Vec<&'static str> {
        self.decisions.borrow().iter().map(Decision::action).collect()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn describe(decision: &Decision) -> &'static str {
    match decision {
        Decision::WhiteoutAbsent { .. } => "whiteout target not on lower:",
        Decision::DeleteWhiteout { .. } => "deleting",
        Decision::CreateDir { .. } => "making dir",
        Decision::ReplaceWithDir { .. } => "replacing with dir",
        Decision::EmptyOpaqueDir { .. } => "emptying opaque dir",
        Decision::MergeDir { .. } => "merging dir",
        Decision::ReplaceWithFile { .. } => "deleting for file",
        Decision::CopyFile { .. } => "copying file to",
        Decision::SkipRoot { .. } | Decision::CopySymlink { .. } => "",
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl SyncObserver for DecisionLog {
    fn observe(&self, decision: &Decision, _dry_run: bool) {
        self.decisions.borrow_mut().push(decision.clone());
    }
}

impl SyncObserver for TracingObserver {
    fn observe(&self, decision: &Decision, dry_run: bool) {
        let upper = decision.upper().display();
        match decision {
            Decision::SkipRoot { .. } => {
                tracing::debug!(action = decision.action(), dry_run, "skipping root {}", upper)
            }
            Decision::CopySymlink { lower, target, .. } => tracing::debug!(
                action = decision.action(),
                dry_run,
                "linking {} -> {} (from {})",
                lower.display(),
                target.display(),
                upper
            ),
            _ => {
                let lower = decision
                    .lower()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                tracing::debug!(
                    action = decision.action(),
                    dry_run,
                    "{} {} (from {})",
                    describe(decision),
                    lower,
                    upper
                )
            }
        }
    }
}

impl<T: SyncObserver + ?Sized> SyncObserver for Box<T> {
    fn observe(&self, decision: &Decision, dry_run: bool) {
        (**self).observe(decision, dry_run)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
