use std::{
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of an overlay sync operation.
pub type SyncerResult<T> = Result<T, SyncerError>;

/// An error that occurred while reconciling an upper layer into a lower layer.
#[derive(pretty_error_debug::Debug, Error)]
pub enum SyncerError {
    /// A layer root does not exist.
    #[error("layer root does not exist: {}", .0.display())]
    LayerNotFound(PathBuf),

    /// The upper layer root is not a directory.
    #[error("layer root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A path could not be expressed relative to the upper layer root.
    #[error(
        "failed to get relative path from {} to {}",
        .root.display(),
        .path.display()
    )]
    PathResolution {
        /// The path that could not be mapped.
        path: PathBuf,

        /// The upper layer root the path was expected to be under.
        root: PathBuf,
    },

    /// A filesystem operation on a single path failed.
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        /// The kind of operation that failed.
        op: FsOp,

        /// The path the operation was applied to.
        path: PathBuf,

        /// The underlying cause.
        #[source]
        source: io::Error,
    },

    /// Copying an upper file into its lower counterpart failed.
    #[error("failed to {op} while copying {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        /// The step of the copy that failed.
        op: FsOp,

        /// The upper layer file.
        from: PathBuf,

        /// The lower layer file.
        to: PathBuf,

        /// The underlying cause.
        #[source]
        source: io::Error,
    },

    /// Listing an entry of the upper layer failed during the walk.
    #[error("failed to walk {}: {source}", display_walk_path(.path))]
    Walk {
        /// The entry being listed, if known.
        path: Option<PathBuf>,

        /// The underlying cause.
        #[source]
        source: walkdir::Error,
    },
}

/// The kind of filesystem operation attached to [`SyncerError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    /// Resolving a path to absolute form.
    Absolute,

    /// Querying the metadata of a path.
    Stat,

    /// Opening a file for reading.
    Open,

    /// Creating or truncating a file for writing.
    Create,

    /// Listing a directory.
    ReadDir,

    /// Removing a file or directory tree.
    Remove,

    /// Creating a directory.
    CreateDir,

    /// Reading the target of a symbolic link.
    ReadLink,

    /// Creating a symbolic link.
    Symlink,

    /// Streaming bytes into a file.
    Write,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SyncerError {
    /// Wraps an I/O error with the operation and path that produced it.
    pub fn io(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> SyncerError {
        SyncerError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Returns the failed operation kind for [`SyncerError::Io`] and [`SyncerError::Copy`].
    pub fn op(&self) -> Option<FsOp> {
        match self {
            SyncerError::Io { op, .. } | SyncerError::Copy { op, .. } => Some(*op),
            _ => None,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn display_walk_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<unknown>".to_string(),
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<walkdir::Error> for SyncerError {
    fn from(error: walkdir::Error) -> Self {
        SyncerError::Walk {
            path: error.path().map(|p| p.to_path_buf()),
            source: error,
        }
    }
}

impl Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            FsOp::Absolute => "resolve",
            FsOp::Stat => "stat",
            FsOp::Open => "open",
            FsOp::Create => "create",
            FsOp::ReadDir => "read dir",
            FsOp::Remove => "remove",
            FsOp::CreateDir => "make dir",
            FsOp::ReadLink => "read link",
            FsOp::Symlink => "create symlink",
            FsOp::Write => "write",
        };
        write!(f, "{}", verb)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
