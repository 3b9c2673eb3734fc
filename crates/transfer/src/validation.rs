use std::path::{Component, Path};

use crate::TransferError;

/// Validates a file name announced by an incoming message.
///
/// The name is joined directly under the resolved destination directory,
/// so it must be a bare file name: no separators, no traversal, no
/// absolute or prefixed paths. Messages are untrusted input.
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidFileName("empty file name".into()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TransferError::InvalidFileName(format!(
            "file name must be a bare name without separators: {name}"
        ))),
    }
}
