//! Error types for the medianator client
//!
//! Every failure aborts the current oracle round; nothing here is retried.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MedianatorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedianatorError {
    #[error("invalid price {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("cannot compute a median over an empty price set")]
    EmptyInput,

    #[error("{len} oracle reports exceed the fixed capacity of {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("value {value} does not fit in u{bits}")]
    OutOfRange { value: String, bits: u32 },

    #[error("signature address {actual} does not match oracle address {expected}")]
    SignatureMismatch { expected: String, actual: String },

    #[error("signer returned a non-string signature: {found}")]
    SignatureFormat { found: String },

    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

impl MedianatorError {
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn collaborator(collaborator: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.to_string(),
        }
    }
}
