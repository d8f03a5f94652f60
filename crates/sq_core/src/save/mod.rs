//! Snapshot persistence
//!
//! Snapshots are value copies of the whole engine state: MessagePack with
//! named fields, LZ4-compressed, checksummed, written atomically. The
//! engine resumes fully from a snapshot and re-derives nothing.

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, LeagueSave};
pub use manager::SaveManager;

/// Save format version for migration checks.
pub const SAVE_VERSION: u32 = 1;
