//! Atomic promotion of completed stubs.

use std::path::Path;

use tracing::{debug, warn};

use crate::TransferError;
use crate::stub::{StubStatus, stub_status};

/// Renames a fully-received stub to its final visible name.
///
/// No-op when the stub is absent or not yet complete: an incomplete stub
/// simply stays on disk for a later resume. The rename is the sole
/// transition that marks a transfer complete; afterwards the stub path no
/// longer exists and the final path holds exactly the expected bytes.
pub async fn finalize(
    stub_path: &Path,
    final_path: &Path,
    expected_size: u64,
) -> Result<(), TransferError> {
    match stub_status(stub_path, expected_size) {
        StubStatus::Complete => {
            tokio::fs::rename(stub_path, final_path).await?;
            debug!(file = %final_path.display(), "stub promoted to final file");
        }
        StubStatus::Incomplete { received } => {
            if received > expected_size {
                warn!(
                    stub = %stub_path.display(),
                    received,
                    expected = expected_size,
                    "stub larger than expected total; finalize skipped"
                );
            } else {
                debug!(received, expected = expected_size, "stub not complete; finalize skipped");
            }
        }
        StubStatus::Inaccessible => {}
    }
    Ok(())
}
