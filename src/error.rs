use thiserror::Error;

/// Conditions callers need to tell apart from plain I/O or storage failures.
///
/// Everything else travels as `eyre::Report`; these are wrapped into it with
/// `?` and recovered with `downcast_ref::<Error>()` where the caller cares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corpus not ready")]
    CorpusNotReady,

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

impl Error {
    pub fn is_not_found(report: &eyre::Report) -> bool {
        matches!(report.downcast_ref::<Error>(), Some(Error::NotFound(_)))
    }
}
