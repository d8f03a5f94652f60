use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl SaveError {
    /// Whether the host may recover by falling back to fresh
    /// initialization rather than treating the snapshot as fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SaveError::Io(_)
                | SaveError::FileNotFound { .. }
                | SaveError::Corrupted
                | SaveError::ChecksumMismatch
                | SaveError::Decompression
                | SaveError::Deserialization(_)
                | SaveError::VersionMismatch { .. }
        )
    }
}
