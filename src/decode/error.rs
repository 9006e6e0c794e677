//! Decoder error type.
//!
//! Leaf variants describe what was expected; the wrapping variants
//! ([`DecodeError::AtOffset`], [`DecodeError::InField`],
//! [`DecodeError::Context`]) record where, so the rendered message reads
//! outermost first: `parsing ticker data: in field `a`: at offset 1:
//! expected JSON number`.

use crate::models::timestamp::ParseTimestampError;

/// Failure to decode one inbound frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An object frame named an `event` this decoder does not know.
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    /// An array frame named a channel whose prefix is not recognized.
    #[error("unknown channel name prefix `{0}`")]
    UnknownChannel(String),

    /// A value had the wrong JSON kind.
    #[error("expected {0}")]
    Expected(String),

    /// An array had the wrong number of elements.
    #[error("expected JSON array with length {expected}, got {actual}")]
    ArrayLength { expected: String, actual: usize },

    /// A required object key was absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A string could not be parsed as a decimal number.
    #[error("could not parse `{value}` as decimal: {source}")]
    Decimal {
        value: String,
        source: rust_decimal::Error,
    },

    #[error(transparent)]
    Timestamp(#[from] ParseTimestampError),

    #[error("at offset {offset}: {source}")]
    AtOffset {
        offset: usize,
        source: Box<DecodeError>,
    },

    #[error("in field `{field}`: {source}")]
    InField {
        field: &'static str,
        source: Box<DecodeError>,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn expected(what: impl Into<String>) -> Self {
        DecodeError::Expected(what.into())
    }

    /// Returns the innermost error, skipping location wrappers.
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::AtOffset { source, .. }
            | DecodeError::InField { source, .. }
            | DecodeError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Adds location information to decode results.
pub(crate) trait ResultExt<T> {
    fn at(self, offset: usize) -> Result<T, DecodeError>;
    fn in_field(self, field: &'static str) -> Result<T, DecodeError>;
    fn context(self, context: impl FnOnce() -> String) -> Result<T, DecodeError>;
}

impl<T> ResultExt<T> for Result<T, DecodeError> {
    fn at(self, offset: usize) -> Result<T, DecodeError> {
        self.map_err(|e| DecodeError::AtOffset {
            offset,
            source: Box::new(e),
        })
    }

    fn in_field(self, field: &'static str) -> Result<T, DecodeError> {
        self.map_err(|e| DecodeError::InField {
            field,
            source: Box::new(e),
        })
    }

    fn context(self, context: impl FnOnce() -> String) -> Result<T, DecodeError> {
        self.map_err(|e| DecodeError::Context {
            context: context(),
            source: Box::new(e),
        })
    }
}
