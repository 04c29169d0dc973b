//! Error types for relief generation.

use thiserror::Error;

/// Result type alias for relief generation.
pub type ReliefResult<T> = Result<T, ReliefError>;

/// All the ways a generation request can be rejected.
///
/// Degenerate geometry (an empty crop mask, a 1-pixel-wide image, a zero
/// height range) is *not* an error: those inputs produce minimal or empty
/// output by design. Errors are reserved for inputs the pipeline refuses
/// to run on at all.
#[derive(Debug, Error)]
pub enum ReliefError {
    /// A configuration field is out of range or non-finite. Rejected at the
    /// pipeline entry, before any allocation.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        reason: String,
    },

    /// The source raster exceeds the pixel budget. Fail-fast: no partial
    /// mesh is ever returned.
    #[error("input too large: {pixels} pixels exceeds the limit of {limit}")]
    InputTooLarge { pixels: usize, limit: usize },

    /// An IO failure while writing or reading a mesh stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReliefError {
    /// Create an invalid-config error for `field`.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = ReliefError::invalid_config("contrast_curve", "must be within 0.1..=10");
        assert!(err.to_string().contains("contrast_curve"));
    }
}
