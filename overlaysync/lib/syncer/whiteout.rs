use std::path::Path;

use crate::{utils, SyncerResult};

use super::{Decision, OverlaySyncer};

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OverlaySyncer {
    /// Deletes the lower layer counterpart of an upper layer whiteout.
    ///
    /// A counterpart that is already absent is not an error, so running this twice for the same
    /// whiteout is harmless.
    pub(crate) fn sync_whiteout(&self, upper: &Path) -> SyncerResult<()> {
        tracing::trace!("processing whiteout {}", upper.display());
        let lower = self.layers.to_lower(upper)?;

        let Some(metadata) = utils::symlink_metadata_option(&lower)? else {
            self.decide(Decision::WhiteoutAbsent {
                upper: upper.to_path_buf(),
                lower,
            });
            return Ok(());
        };

        if self.decide(Decision::DeleteWhiteout {
            upper: upper.to_path_buf(),
            lower: lower.clone(),
        }) {
            utils::remove_path(&lower, &metadata)?;
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
