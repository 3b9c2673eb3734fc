//! Offset-resumable chunk streaming.

use std::path::Path;

use meshbot_protocol::MediaSource;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::request::ProgressFn;
use crate::{TransferError, stub};

/// Appends the remaining bytes of a media stream to a stub file.
///
/// The resume offset is always the stub's current size; bytes already on
/// disk are never re-requested. Chunk fetches are the only suspension
/// points and happen strictly in order: chunk n+1 is not requested before
/// chunk n is appended.
pub struct ChunkStreamer {
    cancel: CancellationToken,
}

impl ChunkStreamer {
    /// Creates a streamer observing `cancel` between chunks.
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Streams `source` into `stub_path` from the current stub size onward.
    ///
    /// On transport or I/O failure the partial stub is left in place and
    /// the error is propagated; a later call resumes from the new offset.
    /// There is no internal retry. Cancellation likewise preserves the
    /// partial stub.
    pub async fn stream(
        &self,
        source: &dyn MediaSource,
        stub_path: &Path,
        expected_size: u64,
        progress: Option<&ProgressFn>,
    ) -> Result<(), TransferError> {
        let mut received = stub::resume_offset(stub_path);
        debug!(
            stub = %stub_path.display(),
            received,
            expected = expected_size,
            "starting chunk stream"
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(stub_path)
            .await?;

        let mut chunks = match source.read_chunks(received).await {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(offset = received, error = %e, "failed to open chunk stream");
                return Err(e.into());
            }
        };

        loop {
            if self.cancel.is_cancelled() {
                debug!(received, "stream cancelled; stub kept for resume");
                return Err(TransferError::Cancelled);
            }

            let chunk = match chunks.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    error!(
                        stub = %stub_path.display(),
                        received,
                        error = %e,
                        "chunk fetch failed; stub kept for resume"
                    );
                    return Err(e.into());
                }
            };

            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            if let Some(progress) = progress {
                progress(received, expected_size);
            }
        }

        file.flush().await?;
        debug!(received, expected = expected_size, "chunk stream finished");
        Ok(())
    }
}
