//! Reference candidate lookup.
//!
//! An entry `top/dir/f.txt` extracted with one strip level is looked up as
//! `<reference>/dir/f.txt`. Nothing here touches the filesystem: whether the
//! candidate exists is discovered by the comparator when it opens it.

use std::path::Path;
use std::path::PathBuf;

/// Removes up to `levels` leading segments from `path`.
///
/// A segment is the text up to and including the next `/`. When fewer
/// separators exist than `levels`, stripping stops and whatever remains is
/// returned; the final segment is never removed.
///
/// # Examples
///
/// ```
/// use ffuntar_core::extraction::resolve::strip_prefix;
///
/// assert_eq!(strip_prefix("top/dir/f.txt", 1), "dir/f.txt");
/// assert_eq!(strip_prefix("a/b.txt", 5), "b.txt");
/// assert_eq!(strip_prefix("a/b.txt", 0), "a/b.txt");
/// ```
#[must_use]
pub fn strip_prefix(path: &str, levels: usize) -> &str {
    let stripped = strip_segments(path.as_bytes(), levels);
    // Cuts only happen right after an ASCII '/', which is a char boundary.
    &path[path.len() - stripped.len()..]
}

/// Byte-level form of [`strip_prefix`], used for non-UTF-8 entry names.
#[must_use]
pub fn strip_segments(path: &[u8], levels: usize) -> &[u8] {
    let mut rest = path;
    for _ in 0..levels {
        match rest.iter().position(|&b| b == b'/') {
            Some(sep) => rest = &rest[sep + 1..],
            None => break,
        }
    }
    rest
}

/// Joins a stripped entry path onto the reference directory.
///
/// Leading separators are dropped first so the candidate always stays under
/// `reference_dir`.
#[must_use]
pub fn resolve(stripped: &Path, reference_dir: &Path) -> PathBuf {
    let relative = stripped.strip_prefix("/").unwrap_or(stripped);
    reference_dir.join(relative)
}

/// Maps entry paths to reference candidates for one run.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    reference_dir: Option<PathBuf>,
    strip_levels: usize,
}

impl ReferenceResolver {
    /// Creates a resolver; `None` disables reference matching.
    #[must_use]
    pub fn new(reference_dir: Option<PathBuf>, strip_levels: usize) -> Self {
        Self {
            reference_dir,
            strip_levels,
        }
    }

    /// Returns the reference candidate for an archive entry path.
    ///
    /// Returns `None` when no reference directory is configured.
    #[must_use]
    pub fn candidate_for(&self, entry_path: &Path) -> Option<PathBuf> {
        let reference_dir = self.reference_dir.as_deref()?;
        let stripped = self.strip(entry_path);
        Some(resolve(&stripped, reference_dir))
    }

    #[cfg(unix)]
    fn strip<'a>(&self, entry_path: &'a Path) -> std::borrow::Cow<'a, Path> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bytes = strip_segments(entry_path.as_os_str().as_bytes(), self.strip_levels);
        std::borrow::Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
    }

    #[cfg(not(unix))]
    fn strip<'a>(&self, entry_path: &'a Path) -> std::borrow::Cow<'a, Path> {
        let text = entry_path.to_string_lossy().replace('\\', "/");
        std::borrow::Cow::Owned(PathBuf::from(strip_prefix(&text, self.strip_levels)))
    }
}
