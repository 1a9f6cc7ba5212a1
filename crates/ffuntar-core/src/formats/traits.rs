//! Common traits for archive format adapters.

use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::types::EntryHeader;

/// One entry of a forward-only archive stream.
///
/// Reading yields the entry's data exactly once; there is no way back.
pub trait EntryStream: Read {
    /// Returns the entry metadata.
    fn header(&self) -> &EntryHeader;

    /// Unpacks a non-regular entry (directory, symlink, hard link, device)
    /// under `output_dir` with the container's own semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be created on disk or would land
    /// outside `output_dir`.
    fn unpack_verbatim(&mut self, output_dir: &Path) -> Result<()>;
}
