//! Entry paths normalised for joining onto the output directory.

use crate::ExtractionError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An archive entry path that cannot escape the output directory.
///
/// Root and `.` components are dropped (tar archives commonly store
/// `./dir/file` and, less often, `/dir/file`); `..` is rejected.
///
/// # Examples
///
/// ```
/// use ffuntar_core::types::SafePath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let safe = SafePath::new(Path::new("./usr/bin/tool"))?;
/// assert_eq!(safe.as_path(), Path::new("usr/bin/tool"));
///
/// assert!(SafePath::new(Path::new("../etc/passwd")).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Normalises an entry path.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathTraversal` if the path contains `..`.
    pub fn new(path: &Path) -> Result<Self> {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    return Err(ExtractionError::PathTraversal {
                        path: path.to_path_buf(),
                    });
                }
                Component::Normal(part) => normalized.push(part),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Ok(Self(normalized))
    }

    /// Returns the normalised relative path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins this path onto `root`.
    #[must_use]
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}
