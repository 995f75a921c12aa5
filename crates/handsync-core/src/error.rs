//! Error types for handsync

use thiserror::Error;

/// Core handsync errors
///
/// A missed joint lookup is not an error: the sampler keeps the previous
/// value. Unknown peers are created lazily and disconnects are lifecycle
/// events, so neither has a variant here.
#[derive(Error, Debug)]
pub enum HandsyncError {
    // Wire errors
    #[error("Malformed snapshot: expected {expected} bytes, got {actual}")]
    MalformedSnapshot { expected: usize, actual: usize },

    #[error("Malformed snapshot: trailing bytes, expected {expected}, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    #[error("Malformed snapshot: invalid pose index {0}")]
    InvalidPoseIndex(i32),

    #[error("Malformed snapshot: invalid flag byte {0:#04x}")]
    InvalidFlag(u8),

    #[error("Malformed snapshot: non-finite {0} transform")]
    NonFiniteTransform(&'static str),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    // Trigger errors
    #[error("Unknown menu: {0}")]
    UnknownMenu(String),

    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),
}

impl HandsyncError {
    /// True for every variant produced while decoding a snapshot
    pub fn is_malformed_snapshot(&self) -> bool {
        matches!(
            self,
            HandsyncError::MalformedSnapshot { .. }
                | HandsyncError::TrailingBytes { .. }
                | HandsyncError::InvalidPoseIndex(_)
                | HandsyncError::InvalidFlag(_)
                | HandsyncError::NonFiniteTransform(_)
        )
    }
}

/// Result type for handsync operations
pub type HandsyncResult<T> = Result<T, HandsyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_variants_are_malformed() {
        assert!(HandsyncError::MalformedSnapshot { expected: 93, actual: 0 }.is_malformed_snapshot());
        assert!(HandsyncError::TrailingBytes { expected: 93, actual: 94 }.is_malformed_snapshot());
        assert!(HandsyncError::InvalidPoseIndex(7).is_malformed_snapshot());
        assert!(HandsyncError::InvalidFlag(2).is_malformed_snapshot());
        assert!(HandsyncError::NonFiniteTransform("head").is_malformed_snapshot());
        assert!(!HandsyncError::UnknownMenu("Menu_05".into()).is_malformed_snapshot());
        assert!(!HandsyncError::Transport("closed".into()).is_malformed_snapshot());
    }

    #[test]
    fn test_messages() {
        let err = HandsyncError::MalformedSnapshot { expected: 93, actual: 12 };
        assert_eq!(err.to_string(), "Malformed snapshot: expected 93 bytes, got 12");
        assert_eq!(
            HandsyncError::InvalidFlag(0xff).to_string(),
            "Malformed snapshot: invalid flag byte 0xff"
        );
    }
}
