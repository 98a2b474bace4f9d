use thiserror::Error;

/// Rejections raised while building a request, before anything is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    #[error("no update data provided")]
    EmptyUpdate,
    #[error("sort order should be asc or desc, got {0}")]
    InvalidSortOrder(String),
    #[error("unknown {kind} {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl Error {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
