//! Error type for the alignment core.
//!
//! The pure steps ([`crate::schedule`], [`crate::align`]) return
//! [`AlignError`]; the file-facing layers wrap it in `anyhow::Error`.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// The onset and position sequences must be co-indexed one-to-one.
    #[error("length mismatch: {onsets} onset events vs {positions} music positions")]
    LengthMismatch { onsets: usize, positions: usize },

    #[error("invalid sample rate {0} Hz (must be finite and > 0)")]
    InvalidSampleRate(f64),

    #[error("invalid song duration {0} s (must be finite and > 0)")]
    InvalidDuration(f64),

    /// `later` starts before `earlier` has finished playing.
    #[error("song segments overlap: '{earlier}' is still playing when '{later}' starts")]
    OverlappingSegments { earlier: String, later: String },

    #[error("invalid song segment '{name}': {reason}")]
    InvalidSegment { name: String, reason: String },
}

impl AlignError {
    pub(crate) fn invalid_segment(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;
