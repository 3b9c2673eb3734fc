use chrono::{DateTime, Utc};
use meshbot_protocol::{MediaSource, SenderIdentity};

use crate::TransferError;
use crate::validation::validate_file_name;

/// Callback invoked with `(bytes_received, bytes_total)` after every
/// appended chunk. Synchronous, in order, once per chunk.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Describes one incoming transfer.
///
/// Created once per incoming media message; immutable for the lifetime of
/// the transfer.
pub struct TransferRequest {
    /// Who sent the media. The destination folder name derives from this.
    pub sender: SenderIdentity,
    /// Timezone-aware message timestamp. The order date derives from this.
    pub timestamp: DateTime<Utc>,
    /// Target file name as announced by the message.
    pub file_name: String,
    /// Expected total media size in bytes.
    pub total_size: u64,
    /// Local hour (0-23) at which messages roll into the next order date.
    pub day_border_local_hour: u8,
    /// Optional per-chunk progress callback.
    pub progress: Option<ProgressFn>,
}

impl TransferRequest {
    /// Creates a request, validating the file name and day-border hour.
    pub fn new(
        sender: SenderIdentity,
        timestamp: DateTime<Utc>,
        file_name: impl Into<String>,
        total_size: u64,
        day_border_local_hour: u8,
    ) -> Result<Self, TransferError> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;
        if day_border_local_hour > 23 {
            return Err(TransferError::InvalidDayBorder(day_border_local_hour));
        }

        Ok(Self {
            sender,
            timestamp,
            file_name,
            total_size,
            day_border_local_hour,
            progress: None,
        })
    }

    /// Builds a request from a media source's own metadata.
    pub fn from_source(
        source: &dyn MediaSource,
        file_name: impl Into<String>,
        day_border_local_hour: u8,
    ) -> Result<Self, TransferError> {
        Self::new(
            source.sender(),
            source.timestamp(),
            file_name,
            source.media_size(),
            day_border_local_hour,
        )
    }

    /// Attaches a progress callback.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }
}
