//! Resumable, chunked media transfer with deterministic destinations.
//!
//! Given a [`MediaSource`](meshbot_protocol::MediaSource) and a
//! [`TransferRequest`], the coordinator streams the attached file to disk
//! incrementally, appending to a `.stub` sibling whose on-disk size is the
//! sole resume offset, and atomically renames it to the final name once
//! fully received. Every run re-derives its state from disk, so a crashed
//! or failed transfer resumes from the persisted offset instead of
//! starting over.

mod config;
mod coordinator;
mod finalize;
mod locks;
mod path;
mod request;
mod stream;
mod stub;
mod validation;

pub use config::TransferConfig;
pub use coordinator::{TransferCoordinator, download};
pub use finalize::finalize;
pub use locks::PathLockMap;
pub use path::{PathResolver, order_date, sanitize_folder_name};
pub use request::{ProgressFn, TransferRequest};
pub use stream::ChunkStreamer;
pub use stub::{StubStatus, is_stub_complete, resume_offset, stub_status};
pub use validation::validate_file_name;

use meshbot_protocol::SourceError;

/// Extension appended to in-progress downloads (`<name>.stub`).
pub const STUB_EXTENSION: &str = "stub";

/// Errors produced by the transfer crate.
///
/// Missing or unreadable stub/final files are never errors: they are
/// disk state meaning "nothing received yet" / "not complete".
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("day border hour out of range: {0}")]
    InvalidDayBorder(u8),

    #[error("config error: {0}")]
    Config(String),

    #[error("cancelled")]
    Cancelled,
}
