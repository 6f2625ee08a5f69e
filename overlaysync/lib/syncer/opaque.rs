use std::path::Path;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The extended attribute overlayfs sets on an upper directory that hides its lower counterpart.
pub const OVERLAY_OPAQUE_XATTR: &str = "trusted.overlay.opaque";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns true if the upper layer directory at `path` is marked opaque.
///
/// A missing attribute, or any failure to read it, means the directory is not opaque.
pub fn is_opaque_dir(path: impl AsRef<Path>) -> bool {
    read_opaque_marker(path.as_ref(), OVERLAY_OPAQUE_XATTR)
}

pub(crate) fn read_opaque_marker(path: &Path, name: &str) -> bool {
    match xattr::get(path, name) {
        Ok(Some(value)) => {
            tracing::trace!(
                "xattr for path {}: {} = {}",
                path.display(),
                name,
                String::from_utf8_lossy(&value)
            );
            is_opaque_value(&value)
        }
        Ok(None) => false,
        Err(e) => {
            tracing::trace!("cannot read {} on {}: {}", name, path.display(), e);
            false
        }
    }
}

fn is_opaque_value(value: &[u8]) -> bool {
    value.eq_ignore_ascii_case(b"y")
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_is_opaque_value() {
        assert!(is_opaque_value(b"y"));
        assert!(is_opaque_value(b"Y"));
        assert!(!is_opaque_value(b"n"));
        assert!(!is_opaque_value(b"yes"));
        assert!(!is_opaque_value(b""));
        assert!(!is_opaque_value(b"y\0"));
    }

    #[test]
    fn test_missing_marker_is_not_opaque() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        assert!(!is_opaque_dir(temp.path()));

        // Read failures degrade to "not opaque"
        assert!(!is_opaque_dir(temp.path().join("missing")));

        Ok(())
    }

    #[test]
    fn test_read_opaque_marker_from_user_xattr() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let name = "user.overlaysync.test";

        if let Err(e) = xattr::set(temp.path(), name, b"Y") {
            eprintln!("skipping: user xattrs unsupported here: {}", e);
            return Ok(());
        }
        assert!(read_opaque_marker(temp.path(), name));

        xattr::set(temp.path(), name, b"n")?;
        assert!(!read_opaque_marker(temp.path(), name));

        Ok(())
    }
}
