//! Archive container adapters.

pub mod detect;
pub mod tar;
pub mod traits;

// Re-export main types for convenience
pub use detect::Compression;
pub use detect::open_decoder;
pub use tar::TarEntry;
pub use traits::EntryStream;
