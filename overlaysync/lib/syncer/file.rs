use std::{
    fs::{self, File, OpenOptions},
    io,
    os::unix::fs::{symlink, OpenOptionsExt},
    path::Path,
};

use crate::{
    utils::{self, LOWER_FILE_MODE},
    FsOp, SyncerError, SyncerResult,
};

use super::{Decision, OverlaySyncer};

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OverlaySyncer {
    /// Copies an upper layer file over its lower layer counterpart.
    ///
    /// Lower files are always overwritten, without comparing content or timestamps. Anything else
    /// at the same name, including a directory tree, is deleted first.
    pub(crate) fn sync_file(&self, upper: &Path) -> SyncerResult<()> {
        tracing::trace!("processing new or updated file {}", upper.display());
        let lower = self.layers.to_lower(upper)?;

        // Opening a link or device for writing would write through it
        if let Some(metadata) = utils::symlink_metadata_option(&lower)? {
            if !metadata.is_file()
                && self.decide(Decision::ReplaceWithFile {
                    upper: upper.to_path_buf(),
                    lower: lower.clone(),
                })
            {
                utils::remove_path(&lower, &metadata)?;
            }
        }

        if self.decide(Decision::CopyFile {
            upper: upper.to_path_buf(),
            lower: lower.clone(),
        }) {
            copy_file(upper, &lower)?;
        }

        Ok(())
    }

    /// Recreates an upper layer symbolic link in the lower layer, replacing whatever is there.
    ///
    /// The link target is copied verbatim and never followed.
    pub(crate) fn sync_symlink(&self, upper: &Path) -> SyncerResult<()> {
        tracing::trace!("processing symlink {}", upper.display());
        let lower = self.layers.to_lower(upper)?;
        let target = fs::read_link(upper).map_err(|e| SyncerError::io(FsOp::ReadLink, upper, e))?;
        let existing = utils::symlink_metadata_option(&lower)?;

        if self.decide(Decision::CopySymlink {
            upper: upper.to_path_buf(),
            lower: lower.clone(),
            target: target.clone(),
        }) {
            if let Some(metadata) = existing {
                utils::remove_path(&lower, &metadata)?;
            }
            symlink(&target, &lower).map_err(|e| SyncerError::io(FsOp::Symlink, &lower, e))?;
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Streams `from` into `to`, creating or truncating `to` with [`LOWER_FILE_MODE`].
///
/// If streaming fails after `to` was opened, the partial `to` is removed before returning.
fn copy_file(from: &Path, to: &Path) -> SyncerResult<()> {
    let copy_err = |op: FsOp, source: io::Error| SyncerError::Copy {
        op,
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let mut src = File::open(from).map_err(|e| copy_err(FsOp::Open, e))?;
    let mut dest = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(LOWER_FILE_MODE)
        .open(to)
        .map_err(|e| copy_err(FsOp::Create, e))?;

    if let Err(e) = io::copy(&mut src, &mut dest) {
        drop(dest);
        if let Err(cleanup) = fs::remove_file(to) {
            tracing::warn!(
                "failed to remove partially copied file {}: {}",
                to.display(),
                cleanup
            );
        }
        return Err(copy_err(FsOp::Write, e));
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use crate::syncer::{tests::helper, DecisionLog};

    use super::*;

    #[test]
    fn test_file_created_in_lower() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        fs::write(upper.join("new.txt"), "fresh")?;

        let log = DecisionLog::new();
        let syncer = helper::syncer(&lower, &upper, false, &log)?;
        syncer.sync_file(&upper.join("new.txt"))?;

        assert_eq!(fs::read_to_string(lower.join("new.txt"))?, "fresh");
        assert_eq!(log.actions(), vec!["copy"]);

        Ok(())
    }

    #[test]
    fn test_file_overwrites_longer_lower_file() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        fs::write(upper.join("f.txt"), "short")?;
        fs::write(lower.join("f.txt"), "a much longer previous content")?;

        let syncer = helper::syncer(&lower, &upper, false, &DecisionLog::new())?;
        syncer.sync_file(&upper.join("f.txt"))?;

        assert_eq!(fs::read_to_string(lower.join("f.txt"))?, "short");

        Ok(())
    }

    #[test]
    fn test_file_replaces_lower_dir() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        fs::write(upper.join("thing"), "now a file")?;
        fs::create_dir_all(lower.join("thing/inner"))?;
        fs::write(lower.join("thing/inner/x"), "x")?;

        let log = DecisionLog::new();
        let syncer = helper::syncer(&lower, &upper, false, &log)?;
        syncer.sync_file(&upper.join("thing"))?;

        assert!(lower.join("thing").is_file());
        assert_eq!(fs::read_to_string(lower.join("thing"))?, "now a file");
        assert_eq!(log.actions(), vec!["replace-with-file", "copy"]);

        Ok(())
    }

    #[test]
    fn test_file_does_not_write_through_lower_symlink() -> anyhow::Result<()> {
        let (temp, lower, upper) = helper::layers()?;
        let outside = temp.path().join("outside.txt");
        fs::write(&outside, "untouched")?;
        symlink(&outside, lower.join("f.txt"))?;
        fs::write(upper.join("f.txt"), "upper")?;

        let dry_log = DecisionLog::new();
        helper::syncer(&lower, &upper, true, &dry_log)?.sync_file(&upper.join("f.txt"))?;
        assert!(fs::symlink_metadata(lower.join("f.txt"))?
            .file_type()
            .is_symlink());

        let log = DecisionLog::new();
        let syncer = helper::syncer(&lower, &upper, false, &log)?;
        syncer.sync_file(&upper.join("f.txt"))?;

        assert!(fs::symlink_metadata(lower.join("f.txt"))?.is_file());
        assert_eq!(fs::read_to_string(lower.join("f.txt"))?, "upper");
        assert_eq!(fs::read_to_string(&outside)?, "untouched");

        // The link removal is part of the plan either way
        assert_eq!(log.actions(), vec!["replace-with-file", "copy"]);
        assert_eq!(dry_log.decisions(), log.decisions());

        Ok(())
    }

    #[test]
    fn test_file_created_with_umasked_0666() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        fs::write(upper.join("exec.sh"), "#!/bin/sh")?;
        fs::set_permissions(upper.join("exec.sh"), fs::Permissions::from_mode(0o755))?;

        let syncer = helper::syncer(&lower, &upper, false, &DecisionLog::new())?;
        syncer.sync_file(&upper.join("exec.sh"))?;

        let mode = fs::metadata(lower.join("exec.sh"))?.permissions().mode() & 0o777;
        assert_eq!(mode & 0o111, 0, "execute bits are not carried over");

        Ok(())
    }

    #[test]
    fn test_file_dry_run_leaves_lower_alone() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        fs::write(upper.join("a"), "upper")?;
        fs::write(upper.join("b"), "upper")?;
        fs::create_dir_all(lower.join("a/sub"))?;
        fs::write(lower.join("b"), "lower")?;

        let log = DecisionLog::new();
        let syncer = helper::syncer(&lower, &upper, true, &log)?;
        syncer.sync_file(&upper.join("a"))?;
        syncer.sync_file(&upper.join("b"))?;

        assert!(lower.join("a/sub").is_dir());
        assert_eq!(fs::read_to_string(lower.join("b"))?, "lower");
        assert_eq!(log.actions(), vec!["replace-with-file", "copy", "copy"]);

        Ok(())
    }

    #[test]
    fn test_file_copy_errors_carry_both_paths() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;

        let syncer = helper::syncer(&lower, &upper, false, &DecisionLog::new())?;
        let err = syncer.sync_file(&upper.join("vanished.txt")).unwrap_err();

        match err {
            SyncerError::Copy { op, from, to, .. } => {
                assert_eq!(op, FsOp::Open);
                assert_eq!(from, upper.join("vanished.txt"));
                assert_eq!(to, lower.join("vanished.txt"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!lower.join("vanished.txt").exists());

        Ok(())
    }

    #[test]
    fn test_partial_copy_is_removed() -> anyhow::Result<()> {
        let (_temp, lower, _upper) = helper::layers()?;
        let to = lower.join("partial.bin");

        // Reading a directory fails after both sides are open
        let err = copy_file(&lower, &to).unwrap_err();

        assert_eq!(err.op(), Some(FsOp::Write));
        assert!(!to.exists());

        Ok(())
    }

    #[test]
    fn test_symlink_recreated_over_existing_entry() -> anyhow::Result<()> {
        let (_temp, lower, upper) = helper::layers()?;
        symlink("../target", upper.join("link"))?;
        fs::create_dir_all(lower.join("link/inner"))?;

        let log = DecisionLog::new();
        let syncer = helper::syncer(&lower, &upper, false, &log)?;
        syncer.sync_symlink(&upper.join("link"))?;

        assert!(fs::symlink_metadata(lower.join("link"))?
            .file_type()
            .is_symlink());
        assert_eq!(fs::read_link(lower.join("link"))?, Path::new("../target"));
        assert_eq!(log.actions(), vec!["symlink"]);

        Ok(())
    }
}
