// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for pattern generation.
//!
//! Every failure aborts the call that produced it. Nothing is clamped or
//! partially constructed.

use thiserror::Error;

/// Broad category of a [`RandsikError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Out-of-range note, rest or pattern fields
    Validation,
    /// Bad generation input (mode, pitch name, time signature, degrees)
    Configuration,
    /// Should never happen
    Internal,
}

/// Errors produced by the core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandsikError {
    /// A note or rest field is out of range
    #[error("Invalid {field} {value}: {reason}")]
    Validation {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },

    /// Pitch name is not in the pitch table
    #[error("Unknown pitch name: {0:?}")]
    UnknownPitchName(String),

    /// Mode name is not in the mode registry
    #[error("Unknown mode: {0:?}")]
    UnknownMode(String),

    /// Time signature is not "beats/unit" with a non-zero unit
    #[error("Invalid time signature: {0:?}")]
    InvalidTimeSignature(String),

    /// Scale degree is zero, negative or past the end of the pitch range
    #[error("Invalid scale degree {degree}: range has {available} pitches")]
    InvalidScaleDegree { degree: i64, available: usize },

    /// A generation option is out of range
    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RandsikError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RandsikError::Validation { .. } => ErrorKind::Validation,
            RandsikError::UnknownPitchName(_)
            | RandsikError::UnknownMode(_)
            | RandsikError::InvalidTimeSignature(_)
            | RandsikError::InvalidScaleDegree { .. }
            | RandsikError::InvalidOption { .. } => ErrorKind::Configuration,
            RandsikError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(field: &'static str, value: i64, reason: &'static str) -> Self {
        RandsikError::Validation { field, value, reason }
    }

    pub(crate) fn option(name: &'static str, reason: impl Into<String>) -> Self {
        RandsikError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RandsikError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            RandsikError::validation("velocity", 200, "must be 0-127").kind(),
            ErrorKind::Validation
        );
        assert_eq!(RandsikError::UnknownMode("x".into()).kind(), ErrorKind::Configuration);
        assert_eq!(
            RandsikError::InvalidScaleDegree { degree: 0, available: 7 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(RandsikError::Internal("empty".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_display() {
        let err = RandsikError::validation("velocity", 200, "must be between 0 and 127");
        assert_eq!(err.to_string(), "Invalid velocity 200: must be between 0 and 127");

        let err = RandsikError::UnknownPitchName("H4".into());
        assert_eq!(err.to_string(), "Unknown pitch name: \"H4\"");
    }
}
