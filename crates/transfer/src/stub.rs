//! Stub completion tracking.
//!
//! A stub's on-disk size is the sole source of truth for both the resume
//! offset and completion. No separate metadata or manifest is kept.

use std::path::Path;

/// Observed state of a stub file relative to its expected total size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubStatus {
    /// Stub size equals the expected total exactly.
    Complete,
    /// Stub exists but does not hold the expected byte count yet.
    Incomplete { received: u64 },
    /// Stub missing or unreadable; treated as zero bytes received.
    Inaccessible,
}

impl StubStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, StubStatus::Complete)
    }
}

/// Reads the stub's status from disk.
///
/// Filesystem errors (including a missing file) are reported as
/// [`StubStatus::Inaccessible`], never raised: they simply mean nothing
/// usable has been received. Completion requires exact size equality.
pub fn stub_status(stub_path: &Path, expected_size: u64) -> StubStatus {
    match std::fs::metadata(stub_path) {
        Ok(meta) if meta.len() == expected_size => StubStatus::Complete,
        Ok(meta) => StubStatus::Incomplete {
            received: meta.len(),
        },
        Err(_) => StubStatus::Inaccessible,
    }
}

/// Boolean boundary over [`stub_status`].
pub fn is_stub_complete(stub_path: &Path, expected_size: u64) -> bool {
    stub_status(stub_path, expected_size).is_complete()
}

/// Byte offset at which the next chunk fetch begins: the stub's current
/// size, or 0 if it cannot be read.
pub fn resume_offset(stub_path: &Path) -> u64 {
    std::fs::metadata(stub_path).map(|m| m.len()).unwrap_or(0)
}
