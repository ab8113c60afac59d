//! Bit stream error types

use thiserror::Error;

/// Result type for voltage-bitstream operations
pub type Result<T> = std::result::Result<T, BitStreamError>;

/// Bit stream errors
///
/// Integer and single-bit operations that fail leave the stream exactly as it
/// was. Multi-byte writes (`put_f32`, `put_f64`, `put_bytes`) are the exception,
/// see their documentation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitStreamError {
    /// No buffer is bound to the stream
    #[error("Bit stream has no buffer bound")]
    Unbound,

    /// The requested field does not fit in the remaining capacity
    #[error("Insufficient bits: requested {requested}, remaining {remaining}")]
    InsufficientBits { requested: usize, remaining: usize },

    /// The requested field is wider than its destination type
    #[error("Invalid field width {width}: type holds at most {max} bits")]
    InvalidWidth { width: u8, max: u32 },
}

// Helper methods for creating errors
impl BitStreamError {
    pub fn insufficient(requested: usize, remaining: usize) -> Self {
        BitStreamError::InsufficientBits {
            requested,
            remaining,
        }
    }

    pub fn invalid_width(width: u8, max: u32) -> Self {
        BitStreamError::InvalidWidth { width, max }
    }

    /// Check if the stream simply ran out of room (as opposed to misuse)
    pub fn is_exhausted(&self) -> bool {
        matches!(self, BitStreamError::InsufficientBits { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BitStreamError::Unbound.to_string(),
            "Bit stream has no buffer bound"
        );
        assert_eq!(
            BitStreamError::insufficient(9, 8).to_string(),
            "Insufficient bits: requested 9, remaining 8"
        );
        assert_eq!(
            BitStreamError::invalid_width(9, 8).to_string(),
            "Invalid field width 9: type holds at most 8 bits"
        );
    }

    #[test]
    fn test_is_exhausted() {
        assert!(BitStreamError::insufficient(1, 0).is_exhausted());
        assert!(!BitStreamError::Unbound.is_exhausted());
        assert!(!BitStreamError::invalid_width(65, 64).is_exhausted());
    }
}
