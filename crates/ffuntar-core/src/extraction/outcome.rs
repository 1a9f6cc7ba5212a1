//! Result of processing one entry.

/// What the pipeline did with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Destination hardlinked to an identical reference file.
    Linked {
        /// Bytes whose write was avoided (the entry size).
        bytes_saved: u64,
    },
    /// Destination written entirely from the archive stream.
    FullCopy,
    /// Destination rebuilt from a verified-equal reference prefix plus
    /// freshly written bytes.
    PartialRecovery {
        /// Bytes copied from the reference file instead of the stream.
        reused_bytes: u64,
    },
    /// Non-regular entry unpacked verbatim.
    PassThrough,
    /// Entry enumerated in list-only mode; nothing written.
    Listed,
}

impl ExtractionOutcome {
    /// Bytes whose write was avoided; zero unless linked.
    #[must_use]
    pub const fn bytes_saved(&self) -> u64 {
        match self {
            Self::Linked { bytes_saved } => *bytes_saved,
            _ => 0,
        }
    }

    /// Short verb for progress output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Linked { .. } => "link",
            Self::FullCopy => "copy",
            Self::PartialRecovery { .. } => "recover",
            Self::PassThrough => "extract",
            Self::Listed => "list",
        }
    }
}
