use std::{
    fs::{self, DirBuilder, Metadata},
    io,
    os::unix::fs::DirBuilderExt,
    path::Path,
};

use crate::{FsOp, SyncerError, SyncerResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Mode used for directories created in the lower layer.
pub const LOWER_DIR_MODE: u32 = 0o700;

/// Mode used for files created in the lower layer, before the process umask is applied.
pub const LOWER_FILE_MODE: u32 = 0o666;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Gets metadata for a path without following symbolic links, returning `None` if the path
/// doesn't exist.
///
/// A path below a non-directory doesn't exist either. This happens during a dry run, where a lower
/// file that an upper directory replaces is still in place when the walk reaches its children.
pub fn symlink_metadata_option(path: &Path) -> SyncerResult<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(m) => Ok(Some(m)),
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) =>
        {
            Ok(None)
        }
        Err(e) => Err(SyncerError::io(FsOp::Stat, path, e)),
    }
}

/// Removes a path, recursing into it if `metadata` says it is a directory.
///
/// Symbolic links are removed themselves, never their targets.
pub fn remove_path(path: &Path, metadata: &Metadata) -> SyncerResult<()> {
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    result.map_err(|e| SyncerError::io(FsOp::Remove, path, e))
}

/// Creates a directory and any missing ancestors with [`LOWER_DIR_MODE`].
pub fn create_lower_dir(path: &Path) -> SyncerResult<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(LOWER_DIR_MODE)
        .create(path)
        .map_err(|e| SyncerError::io(FsOp::CreateDir, path, e))
}

/// Removes every child of a directory, leaving the directory itself in place.
pub fn clear_dir_entries(path: &Path) -> SyncerResult<()> {
    let entries = fs::read_dir(path).map_err(|e| SyncerError::io(FsOp::ReadDir, path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SyncerError::io(FsOp::ReadDir, path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| SyncerError::io(FsOp::Stat, &entry_path, e))?;

        let result = if file_type.is_dir() {
            fs::remove_dir_all(&entry_path)
        } else {
            fs::remove_file(&entry_path)
        };
        result.map_err(|e| SyncerError::io(FsOp::Remove, &entry_path, e))?;
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
