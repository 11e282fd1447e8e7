use std::error::Error as StdError;

use thiserror::Error;

/// lyricsync's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// lyricsync's crate-wide error type.
///
/// Only fatal conditions surface here. Recoverable misses (unknown dictionary words,
/// unparsable numerals, infeasible reconciliation, unsnappable runs) are logged and skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// Ruby markup that does not split into `{base|reading}` or carries an empty reading.
    #[error("malformed ruby markup `{markup}`: {reason}")]
    Format { markup: String, reason: String },

    /// The forced aligner returned a timing list that does not match the token list.
    #[error("aligner returned {got} timings for {expected} tokens")]
    AlignmentMismatch { expected: usize, got: usize },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn format(markup: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            markup: markup.into(),
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
