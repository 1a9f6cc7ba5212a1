//! Extraction configuration.

use std::path::PathBuf;

/// What to do when a single entry fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failing entry.
    #[default]
    FailFast,
    /// Record the failure, then continue with the next entry.
    ///
    /// Container decode errors still abort the run.
    ContinueOnError,
}

/// Configuration for a flash-friendly extraction run.
///
/// # Examples
///
/// ```
/// use ffuntar_core::ExtractConfig;
///
/// // Plain extraction into the working directory
/// let config = ExtractConfig::default();
/// assert!(config.reference_dir.is_none());
///
/// // Link against a previous tree, stripping the top-level directory
/// let config = ExtractConfig::new()
///     .with_reference_dir(Some("/data/previous".into()))
///     .with_strip_levels(1)
///     .with_preserve_attributes(true);
/// assert_eq!(config.strip_levels, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Root of the tree consulted for identical files.
    ///
    /// `None` means every regular entry is copied.
    ///
    /// Default: `None`.
    pub reference_dir: Option<PathBuf>,

    /// Number of leading path segments removed before the reference lookup.
    ///
    /// Default: `0`.
    pub strip_levels: usize,

    /// Directory the archive is extracted into.
    ///
    /// Default: `.` (the working directory).
    pub output_dir: PathBuf,

    /// Propagate permission bits, ACLs and file flags in addition to the
    /// modification time.
    ///
    /// Default: `false`.
    pub preserve_attributes: bool,

    /// Walk the whole stream but write nothing.
    ///
    /// Default: `false`.
    pub list_only: bool,

    /// Behaviour on a failing entry.
    ///
    /// Default: [`FailurePolicy::FailFast`].
    pub failure_policy: FailurePolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            reference_dir: None,
            strip_levels: 0,
            output_dir: PathBuf::from("."),
            preserve_attributes: false,
            list_only: false,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl ExtractConfig {
    /// Creates a new `ExtractConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reference directory.
    #[must_use]
    pub fn with_reference_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.reference_dir = dir;
        self
    }

    /// Sets the number of stripped leading segments.
    #[must_use]
    pub fn with_strip_levels(mut self, levels: usize) -> Self {
        self.strip_levels = levels;
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets whether permissions, ACLs and flags are preserved.
    #[must_use]
    pub fn with_preserve_attributes(mut self, preserve: bool) -> Self {
        self.preserve_attributes = preserve;
        self
    }

    /// Sets list-only mode.
    #[must_use]
    pub fn with_list_only(mut self, list_only: bool) -> Self {
        self.list_only = list_only;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert!(config.reference_dir.is_none());
        assert_eq!(config.strip_levels, 0);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.preserve_attributes);
        assert!(!config.list_only);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_builder_methods() {
        let config = ExtractConfig::new()
            .with_reference_dir(Some(PathBuf::from("/ref")))
            .with_strip_levels(2)
            .with_output_dir("/out")
            .with_preserve_attributes(true)
            .with_list_only(true)
            .with_failure_policy(FailurePolicy::ContinueOnError);

        assert_eq!(config.reference_dir, Some(PathBuf::from("/ref")));
        assert_eq!(config.strip_levels, 2);
        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert!(config.preserve_attributes);
        assert!(config.list_only);
        assert_eq!(config.failure_policy, FailurePolicy::ContinueOnError);
    }
}
