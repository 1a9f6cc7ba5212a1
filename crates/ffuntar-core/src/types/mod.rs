//! Entry metadata and path types shared by the extraction pipeline.

pub mod entry_type;
pub mod header;
pub mod safe_path;

pub use entry_type::EntryKind;
pub use header::EntryHeader;
pub use safe_path::SafePath;
