//! Classified page failures.
//!
//! The public API returns `anyhow::Result`; a `PageError` travels inside the
//! `anyhow::Error` so callers can tell corruption apart from misuse:
//!
//! ```
//! use pageq::{page_error_kind, MemoryPage, PageError, PageIo};
//!
//! let mut page = MemoryPage::new(64);
//! let err = page.write(b"x", 1).unwrap_err();
//! assert!(matches!(page_error_kind(&err), Some(PageError::NotActive)));
//! ```

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Buffer too small for the header, initial bytes, or a record.
    #[error("page capacity exceeded: need {needed} bytes, capacity {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },

    #[error("page version mismatch, expecting: {expected}, this version: {actual}")]
    FormatVersionMismatch { expected: u16, actual: u16 },

    /// Fewer bytes left than the record (or header) at `offset` claims.
    #[error("page truncated at offset {offset}: need {needed} bytes, capacity {capacity}")]
    Truncated {
        offset: usize,
        needed: usize,
        capacity: usize,
    },

    #[error("page minSeqNum mismatch, expected: {expected}, actual: {actual}")]
    SequenceMismatch { expected: u64, actual: u64 },

    #[error(
        "record checksum mismatch at offset {offset} (seq_num={seq_num}, stored={stored:#010x}, computed={computed:#010x})"
    )]
    ChecksumMismatch {
        offset: usize,
        seq_num: u64,
        stored: u32,
        computed: u32,
    },

    #[error("seq_num {seq_num} outside page range [{min_seq_num}, +{element_count})")]
    SeqNumOutOfRange {
        seq_num: u64,
        min_seq_num: u64,
        element_count: usize,
    },

    #[error("page is not active (create or open first)")]
    NotActive,

    #[error("page is already active")]
    AlreadyActive,
}

/// Extract the classified kind from an `anyhow::Error`, if any.
pub fn page_error_kind(err: &anyhow::Error) -> Option<&PageError> {
    err.downcast_ref::<PageError>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn kind_survives_context() {
        let res: anyhow::Result<()> = Err(PageError::SequenceMismatch {
            expected: 5,
            actual: 6,
        })
        .context("replay record #0");
        let err = res.unwrap_err();
        assert_eq!(
            page_error_kind(&err),
            Some(&PageError::SequenceMismatch {
                expected: 5,
                actual: 6
            })
        );
        assert!(format!("{err:#}").contains("expected: 5, actual: 6"));
    }
}
