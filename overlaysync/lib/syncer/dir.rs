use std::path::{Path, PathBuf};

use crate::{utils, SyncerResult};

use super::{opaque, Decision, OverlaySyncer};

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OverlaySyncer {
    /// Reconciles an upper layer directory with its lower layer counterpart.
    pub(crate) fn sync_dir(&self, upper: &Path) -> SyncerResult<()> {
        tracing::trace!("processing dir {}", upper.display());
        let lower = self.layers.to_lower(upper)?;
        let opaque = opaque::is_opaque_dir(upper);

        self.reconcile_dir(upper, lower, opaque)
    }

    /// Applies the directory decision once the opaque marker is known.
    ///
    /// - nothing at `lower`: create it
    /// - a non-directory at `lower`: delete it and create a directory in its place
    /// - a directory at `lower`, `opaque`: remove its children, keep the directory
    /// - a directory at `lower`, not `opaque`: leave it, children merge as the walk reaches them
    pub(crate) fn reconcile_dir(
        &self,
        upper: &Path,
        lower: PathBuf,
        opaque: bool,
    ) -> SyncerResult<()> {
        let upper = upper.to_path_buf();
        let Some(metadata) = utils::symlink_metadata_option(&lower)? else {
            if self.decide(Decision::CreateDir {
                upper,
                lower: lower.clone(),
            }) {
                utils::create_lower_dir(&lower)?;
            }
            return Ok(());
        };

        // A symlink to a directory counts as a non-directory, it is never merged through
        if !metadata.is_dir() {
            if self.decide(Decision::ReplaceWithDir {
                upper,
                lower: lower.clone(),
            }) {
                utils::remove_path(&lower, &metadata)?;
                utils::create_lower_dir(&lower)?;
            }
            return Ok(());
        }

        if opaque {
            if self.decide(Decision::EmptyOpaqueDir {
                upper,
                lower: lower.clone(),
            }) {
                utils::clear_dir_entries(&lower)?;
            }
        } else {
            self.decide(Decision::MergeDir { upper, lower });
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
