use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use getset::Getters;

use crate::{FsOp, SyncerError, SyncerResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The pair of roots being reconciled: the persistent lower layer and the writable upper layer
/// of an overlay mount.
///
/// Both roots are resolved to absolute form when the pair is constructed and never change
/// afterwards.
///
/// ## Examples
///
/// ```no_run
/// use overlaysync::config::LayerPair;
///
/// let layers = LayerPair::new("/var/lib/sandbox/lower", "/var/lib/sandbox/upper")?;
///
/// assert_eq!(
///     layers.to_lower("/var/lib/sandbox/upper/etc/hosts")?,
///     std::path::PathBuf::from("/var/lib/sandbox/lower/etc/hosts")
/// );
/// # Ok::<(), overlaysync::SyncerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct LayerPair {
    /// Absolute path of the lower layer root.
    lower: PathBuf,

    /// Absolute path of the upper layer root.
    upper: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LayerPair {
    /// Creates a new `LayerPair`, resolving relative roots against the current working directory.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - either root cannot be made absolute
    /// - either root does not exist
    /// - the upper root is not a directory
    pub fn new(lower: impl AsRef<Path>, upper: impl AsRef<Path>) -> SyncerResult<Self> {
        let lower = absolute(lower.as_ref())?;
        let upper = absolute(upper.as_ref())?;

        ensure_exists(&lower)?;
        if !ensure_exists(&upper)?.is_dir() {
            return Err(SyncerError::NotADirectory(upper));
        }

        Ok(Self { lower, upper })
    }

    /// Maps a path inside the upper layer to the corresponding path inside the lower layer.
    ///
    /// The upper root prefix is replaced by the lower root prefix and the relative suffix is kept
    /// as is. The upper root itself maps to the lower root.
    pub fn to_lower(&self, upper_path: impl AsRef<Path>) -> SyncerResult<PathBuf> {
        let upper_path = upper_path.as_ref();
        let relative =
            upper_path
                .strip_prefix(&self.upper)
                .map_err(|_| SyncerError::PathResolution {
                    path: upper_path.to_path_buf(),
                    root: self.upper.clone(),
                })?;

        if relative.as_os_str().is_empty() {
            return Ok(self.lower.clone());
        }

        Ok(self.lower.join(relative))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn absolute(path: &Path) -> SyncerResult<PathBuf> {
    std::path::absolute(path).map_err(|e| SyncerError::io(FsOp::Absolute, path, e))
}

fn ensure_exists(path: &Path) -> SyncerResult<fs::Metadata> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SyncerError::LayerNotFound(path.to_path_buf()))
        }
        Err(e) => Err(SyncerError::io(FsOp::Stat, path, e)),
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for LayerPair {
    /// Formats the pair as "lower:upper".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower.display(), self.upper.display())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_layer_pair_resolves_roots() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let lower = temp.path().join("lower");
        let upper = temp.path().join("upper");
        fs::create_dir(&lower)?;
        fs::create_dir(&upper)?;

        let layers = LayerPair::new(&lower, &upper)?;
        assert!(layers.get_lower().is_absolute());
        assert!(layers.get_upper().is_absolute());
        assert_eq!(layers.get_lower(), &lower);
        assert_eq!(layers.get_upper(), &upper);
        assert_eq!(
            layers.to_string(),
            format!("{}:{}", lower.display(), upper.display())
        );

        Ok(())
    }

    #[test]
    fn test_layer_pair_rejects_missing_roots() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let upper = temp.path().join("upper");
        fs::create_dir(&upper)?;

        let missing = temp.path().join("missing");
        let err = LayerPair::new(&missing, &upper).unwrap_err();
        assert!(matches!(err, SyncerError::LayerNotFound(ref p) if p == &missing));

        let err = LayerPair::new(&upper, &missing).unwrap_err();
        assert!(matches!(err, SyncerError::LayerNotFound(ref p) if p == &missing));

        Ok(())
    }

    #[test]
    fn test_layer_pair_rejects_file_as_upper_root() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let lower = temp.path().join("lower");
        let upper = temp.path().join("upper");
        fs::create_dir(&lower)?;
        fs::write(&upper, "not a dir")?;

        let err = LayerPair::new(&lower, &upper).unwrap_err();
        assert!(matches!(err, SyncerError::NotADirectory(_)));

        Ok(())
    }

    #[test]
    fn test_layer_pair_to_lower() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let lower = temp.path().join("lower");
        let upper = temp.path().join("upper");
        fs::create_dir(&lower)?;
        fs::create_dir(&upper)?;
        let layers = LayerPair::new(&lower, &upper)?;

        assert_eq!(layers.to_lower(&upper)?, lower);
        assert_eq!(
            layers.to_lower(upper.join("docs/guide/readme.txt"))?,
            lower.join("docs/guide/readme.txt")
        );

        // Paths outside the upper root cannot be mapped
        let err = layers.to_lower(temp.path().join("elsewhere")).unwrap_err();
        assert!(matches!(err, SyncerError::PathResolution { .. }));

        // A sibling sharing the upper root's name as a string prefix is not a descendant
        let err = layers.to_lower(temp.path().join("upper2/file")).unwrap_err();
        assert!(matches!(err, SyncerError::PathResolution { .. }));

        Ok(())
    }
}
