//! Crate-wide error type.
//!
//! Each module owns a focused error enum; [`GlitchError`] wraps them for
//! callers that drive several engines and want a single `?`-friendly type.

use thiserror::Error;

use crate::buffer::BufferError;
use crate::spectral::SpectralError;

/// Error returned when a name does not match any variant of a
/// string-selectable enum such as [`ComponentOrder`](crate::ComponentOrder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Human-readable name of the enum being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Comma-separated accepted names
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Any error produced by the engines.
#[derive(Debug, Error)]
pub enum GlitchError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Spectral(#[from] SpectralError),

    #[error(transparent)]
    Parse(#[from] ParseEnumError),
}
