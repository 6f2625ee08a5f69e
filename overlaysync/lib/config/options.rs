use getset::Setters;
use typed_builder::TypedBuilder;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Run configuration for a sync.
///
/// ## Examples
///
/// ```
/// use overlaysync::config::SyncOptions;
///
/// let options = SyncOptions::builder().dry_run(true).build();
/// assert!(options.is_dry_run());
///
/// assert!(!SyncOptions::default().is_dry_run());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, TypedBuilder, Setters)]
pub struct SyncOptions {
    /// When set, every decision is made and reported but nothing in the lower layer is changed.
    #[builder(default)]
    #[getset(set = "pub")]
    dry_run: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl SyncOptions {
    /// Returns true if mutations are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
