//! Messaging-layer boundary types.
//!
//! The bot/transport layer that authenticates users and delivers chunk
//! streams is an external collaborator. This crate pins down exactly what
//! the transfer core consumes from it: sender identity, a timezone-aware
//! message timestamp, the expected media size, and an offset-based chunked
//! read primitive.

pub mod source;
pub mod types;

// Re-export primary types for convenience.
pub use source::{ChunkStream, MediaSource, SourceError};
pub use types::SenderIdentity;
