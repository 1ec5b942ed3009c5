use std::time::Duration;

/// Errors raised while extracting a listing.
///
/// Optional fields and unmapped category labels never show up here: they
/// resolve to `None` or an `Unknown` variant where they are read.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("mandatory field `{field}` is missing from the page")]
    MandatoryFieldMissing { field: &'static str },

    #[error("could not parse {what} from {input:?}")]
    ParseFormatMismatch { what: &'static str, input: String },

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("invalid url: {0}")]
    Url(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Browser(#[from] anyhow::Error),
}

impl ScrapeError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::MandatoryFieldMissing { field }
    }

    pub(crate) fn mismatch(what: &'static str, input: impl Into<String>) -> Self {
        Self::ParseFormatMismatch {
            what,
            input: input.into(),
        }
    }
}
