use std::path::Path;

use crate::{
    config::{LayerPair, SyncOptions},
    SyncerResult,
};

use super::{Decision, SyncObserver, TracingObserver};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Reconciles the upper layer of an overlay mount into its lower layer.
///
/// Each call to [`sync`](OverlaySyncer::sync) walks the whole upper layer once, top-down, and for
/// every entry creates, overwrites, merges or deletes the matching lower layer path so that the
/// lower layer ends up holding the overlay's merged view.
///
/// ## Examples
///
/// ```no_run
/// use overlaysync::OverlaySyncer;
///
/// let mut syncer = OverlaySyncer::new("/sandbox/lower", "/sandbox/upper")?;
/// syncer.set_dry_run(true);
/// syncer.sync()?;
/// # Ok::<(), overlaysync::SyncerError>(())
/// ```
pub struct OverlaySyncer {
    /// The lower and upper layer roots.
    pub(super) layers: LayerPair,

    /// Run configuration.
    pub(super) options: SyncOptions,

    /// Where decisions are reported.
    pub(super) observer: Box<dyn SyncObserver>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OverlaySyncer {
    /// Creates a new syncer for the given lower and upper layer roots.
    ///
    /// Relative roots are resolved against the current working directory. Decisions are reported
    /// through [`TracingObserver`].
    pub fn new(lower: impl AsRef<Path>, upper: impl AsRef<Path>) -> SyncerResult<Self> {
        let layers = LayerPair::new(lower, upper)?;
        Ok(Self::with_options(layers, SyncOptions::default()))
    }

    /// Creates a new syncer from an already resolved layer pair and run configuration.
    pub fn with_options(layers: LayerPair, options: SyncOptions) -> Self {
        Self {
            layers,
            options,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replaces the observer that decisions are reported to.
    pub fn with_observer(mut self, observer: impl SyncObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Returns the layer roots.
    pub fn get_layers(&self) -> &LayerPair {
        &self.layers
    }

    /// Returns the absolute lower layer root.
    pub fn get_lower_layer_path(&self) -> &Path {
        self.layers.get_lower()
    }

    /// Returns the absolute upper layer root.
    pub fn get_upper_layer_path(&self) -> &Path {
        self.layers.get_upper()
    }

    /// Enables or disables dry run.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.options.set_dry_run(dry_run);
    }

    /// Returns true if mutations are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.options.is_dry_run()
    }

    /// Reports a decision and returns true if it should also be applied.
    pub(super) fn decide(&self, decision: Decision) -> bool {
        let dry_run = self.is_dry_run();
        self.observer.observe(&decision, dry_run);
        !dry_run
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_syncer_accessors_and_dry_run_toggle() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let lower = temp.path().join("lower");
        let upper = temp.path().join("upper");
        fs::create_dir(&lower)?;
        fs::create_dir(&upper)?;

        let mut syncer = OverlaySyncer::new(&lower, &upper)?;
        assert_eq!(syncer.get_lower_layer_path(), lower.as_path());
        assert_eq!(syncer.get_upper_layer_path(), upper.as_path());
        assert!(!syncer.is_dry_run());

        syncer.set_dry_run(true);
        assert!(syncer.is_dry_run());
        assert!(!syncer.decide(Decision::SkipRoot {
            upper: upper.clone()
        }));

        syncer.set_dry_run(false);
        assert!(syncer.decide(Decision::SkipRoot { upper }));

        Ok(())
    }
}
