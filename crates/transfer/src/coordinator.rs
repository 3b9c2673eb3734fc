//! Transfer orchestration: one idempotent `run()` per request.
//!
//! The coordinator walks `Uninitialized → PathResolved → {ShortCircuited |
//! Streaming → Finalized}` but keeps no completion flags in memory: every
//! `run()` re-evaluates state from disk, which is what makes it resumable
//! across process restarts.

use std::path::PathBuf;
use std::sync::Arc;

use meshbot_protocol::MediaSource;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::finalize::finalize;
use crate::locks::PathLockMap;
use crate::path::PathResolver;
use crate::request::TransferRequest;
use crate::stream::ChunkStreamer;
use crate::stub::stub_status;
use crate::{STUB_EXTENSION, TransferError};

/// Downloads the media described by `request` and returns the final path.
///
/// Convenience composition of [`TransferCoordinator::init`] and
/// [`TransferCoordinator::run`] — the single exposed entry point for
/// callers that do not need cancellation control.
pub async fn download(
    source: &dyn MediaSource,
    request: TransferRequest,
    data_root: impl Into<PathBuf>,
    locks: Arc<PathLockMap>,
) -> Result<PathBuf, TransferError> {
    let mut coordinator = TransferCoordinator::new(request, data_root, locks);
    coordinator.init()?;
    coordinator.run(source).await
}

/// Cached destination paths for one transfer.
#[derive(Clone)]
struct ResolvedPaths {
    final_path: PathBuf,
    stub_path: PathBuf,
}

/// Orchestrates one resumable transfer.
pub struct TransferCoordinator {
    request: TransferRequest,
    resolver: PathResolver,
    locks: Arc<PathLockMap>,
    cancel: CancellationToken,
    resolved: Option<ResolvedPaths>,
}

impl TransferCoordinator {
    /// Creates a coordinator for one request, rooted at `data_root`.
    pub fn new(
        request: TransferRequest,
        data_root: impl Into<PathBuf>,
        locks: Arc<PathLockMap>,
    ) -> Self {
        Self {
            request,
            resolver: PathResolver::new(data_root),
            locks,
            cancel: CancellationToken::new(),
            resolved: None,
        }
    }

    /// Token for cancelling an in-flight stream. The partial stub survives
    /// cancellation and a later `run()` resumes from its size.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolves and caches the destination paths.
    ///
    /// Side-effecting (creates the destination directory) but idempotent
    /// and safe to call repeatedly.
    pub fn init(&mut self) -> Result<(), TransferError> {
        self.resolve_paths().map(|_| ())
    }

    fn resolve_paths(&mut self) -> Result<ResolvedPaths, TransferError> {
        if let Some(paths) = &self.resolved {
            return Ok(paths.clone());
        }

        let dir = self.resolver.resolve(
            &self.request.sender,
            self.request.timestamp,
            self.request.day_border_local_hour,
        )?;

        let paths = ResolvedPaths {
            final_path: dir.join(&self.request.file_name),
            stub_path: dir.join(format!("{}.{STUB_EXTENSION}", self.request.file_name)),
        };
        self.resolved = Some(paths.clone());
        Ok(paths)
    }

    /// Runs the transfer to completion and returns the final path.
    ///
    /// 1. If the final file exists, short-circuits: no network access, no
    ///    stub inspection.
    /// 2. Otherwise streams the remaining bytes into the stub.
    /// 3. Promotes the stub if it is now complete.
    ///
    /// Safe to call multiple times for the same request; a failed run
    /// leaves the partial stub behind and is retryable.
    pub async fn run(&mut self, source: &dyn MediaSource) -> Result<PathBuf, TransferError> {
        let paths = self.resolve_paths()?;

        // Serialize concurrent transfers to the same destination.
        let _guard = self.locks.acquire(&paths.final_path).await;

        if let Ok(meta) = tokio::fs::metadata(&paths.final_path).await {
            // Existence is trusted; a size mismatch is only surfaced.
            if meta.len() != self.request.total_size {
                warn!(
                    file = %paths.final_path.display(),
                    on_disk = meta.len(),
                    expected = self.request.total_size,
                    "existing final file size differs from expected total"
                );
            }
            info!(file = %paths.final_path.display(), "already downloaded");
            return Ok(paths.final_path);
        }

        if !stub_status(&paths.stub_path, self.request.total_size).is_complete() {
            let streamer = ChunkStreamer::new(self.cancel.clone());
            streamer
                .stream(
                    source,
                    &paths.stub_path,
                    self.request.total_size,
                    self.request.progress.as_ref(),
                )
                .await?;
        }

        finalize(&paths.stub_path, &paths.final_path, self.request.total_size).await?;

        info!(file = %paths.final_path.display(), "transfer complete");
        Ok(paths.final_path)
    }
}
