//! Capability trait for media messages with an attached file.
//!
//! `MediaSource` is implemented by the bot layer on top of the actual
//! transport client. Using a trait keeps the transfer core decoupled from
//! the protocol client and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::types::SenderIdentity;

/// Errors surfaced by a media source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("media unavailable: {0}")]
    Unavailable(String),
}

/// A finite, in-order sequence of byte chunks.
///
/// Streams are not restartable: resuming from a different offset requires
/// a new [`MediaSource::read_chunks`] call.
pub trait ChunkStream: Send {
    /// Fetches the next chunk. `Ok(None)` marks the end of the stream.
    fn next_chunk(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, SourceError>> + Send + '_>>;
}

/// Abstract media message whose attachment can be read in chunks.
pub trait MediaSource: Send + Sync {
    /// Identity of the message sender.
    fn sender(&self) -> SenderIdentity;

    /// Timezone-aware timestamp of the message.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Total size of the attached media in bytes.
    fn media_size(&self) -> u64;

    /// Starts a chunked read of the media beginning at byte `offset`.
    fn read_chunks(
        &self,
        offset: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn ChunkStream>, SourceError>> + Send + '_>>;
}
