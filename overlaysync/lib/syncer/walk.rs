use std::{fs::FileType, os::unix::fs::FileTypeExt};

use walkdir::{DirEntry, WalkDir};

use crate::SyncerResult;

use super::{Decision, OverlaySyncer};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How an upper layer entry is reconciled, derived from its file type alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, reconciled by creating, replacing, emptying or merging its lower counterpart.
    Directory,

    /// A character device, which overlayfs uses to mark a name as deleted.
    Whiteout,

    /// A symbolic link, recreated as a link.
    Symlink,

    /// Anything else, copied byte for byte.
    File,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl EntryKind {
    /// Classifies a file type. The type must come from `lstat`, not `stat`.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_char_device() {
            EntryKind::Whiteout
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::File
        }
    }
}

impl OverlaySyncer {
    /// Syncs the upper layer into the lower layer.
    ///
    /// The upper layer is walked once, depth-first and pre-order, so every directory is reconciled
    /// before its children. Entries within a directory are visited in file name order. The first
    /// error aborts the walk and is returned with the offending path attached; whatever was applied
    /// before it stays applied.
    pub fn sync(&self) -> SyncerResult<()> {
        tracing::info!(
            lower = %self.layers.get_lower().display(),
            upper = %self.layers.get_upper().display(),
            dry_run = self.is_dry_run(),
            "syncing upper layer into lower layer"
        );

        let walker = WalkDir::new(self.layers.get_upper())
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            self.sync_entry(&entry?)?;
        }

        tracing::info!("sync complete");
        Ok(())
    }

    fn sync_entry(&self, entry: &DirEntry) -> SyncerResult<()> {
        let path = entry.path();
        if entry.depth() == 0 {
            self.decide(Decision::SkipRoot {
                upper: path.to_path_buf(),
            });
            return Ok(());
        }

        match EntryKind::from_file_type(entry.file_type()) {
            EntryKind::Directory => self.sync_dir(path),
            EntryKind::Whiteout => self.sync_whiteout(path),
            EntryKind::Symlink => self.sync_symlink(path),
            EntryKind::File => self.sync_file(path),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
