//! Error types for lookup, binning, masking and parsing.

use thiserror::Error;

/// Errors raised by the format mapping components.
///
/// Every failure is a caller-input problem; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Key is absent and the table has no default value.
    #[error("no mapping for key {key} and no default configured")]
    MissingDefault { key: String },

    /// Same key supplied twice with different values.
    #[error("duplicate key {key}: {existing:?} conflicts with {incoming:?}")]
    DuplicateKey {
        key: String,
        existing: String,
        incoming: String,
    },

    /// Value falls outside every configured interval.
    #[error("value {value} is outside the binning range [{lower}, {upper}]")]
    OutOfRange { value: f64, lower: f64, upper: f64 },

    /// User-supplied labels do not match the number of intervals.
    #[error("expected {expected} labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    /// Boundaries are not strictly increasing or cannot be generated.
    #[error("invalid bin boundaries: {reason}")]
    InvalidBoundaries { reason: String },

    /// Text could not be converted by the named format.
    #[error("cannot parse {text:?} with format {format}: {reason}")]
    UnparsableValue {
        text: String,
        format: String,
        reason: String,
    },

    /// Value is outside the domain of the named format.
    #[error("cannot render {value} with format {format}: {reason}")]
    UnrenderableValue {
        value: String,
        format: String,
        reason: String,
    },

    /// No definition registered under this name.
    #[error("unknown format: {name}")]
    UnknownFormat { name: String },

    /// A definition with this name is already registered.
    #[error("format {name} is already registered")]
    DuplicateFormat { name: String },

    /// Format names must contain at least one non-blank character.
    #[error("invalid format name {name:?}")]
    InvalidFormatName { name: String },

    /// Catalog configuration could not be read.
    #[error("invalid catalog: {0}")]
    Catalog(String),
}

impl FormatError {
    pub fn unparsable(
        text: impl Into<String>,
        format: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnparsableValue {
            text: text.into(),
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn unrenderable(
        value: impl ToString,
        format: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnrenderableValue {
            value: value.to_string(),
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_boundaries(reason: impl Into<String>) -> Self {
        Self::InvalidBoundaries {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(error: serde_json::Error) -> Self {
        Self::Catalog(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
