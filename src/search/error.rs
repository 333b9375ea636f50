use thiserror::Error;

use crate::models::Category;

/// What went wrong while querying one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The request never produced a response (DNS, connect, timeout)
    Transport,
    /// The provider answered with an error (non-2xx or an `error` field)
    Provider,
    /// The response body could not be decoded
    Payload,
    /// The task running the query failed unexpectedly
    Fault,
}

/// Failure of one category's query, isolated from the other categories
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{category} search failed: {message}")]
pub struct SourceError {
    pub category: Category,
    pub kind: SourceErrorKind,
    pub message: String,
}

impl SourceError {
    pub fn new<S: Into<String>>(category: Category, kind: SourceErrorKind, message: S) -> Self {
        Self {
            category,
            kind,
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(category: Category, message: S) -> Self {
        Self::new(category, SourceErrorKind::Transport, message)
    }

    pub fn provider<S: Into<String>>(category: Category, message: S) -> Self {
        Self::new(category, SourceErrorKind::Provider, message)
    }

    pub fn payload<S: Into<String>>(category: Category, message: S) -> Self {
        Self::new(category, SourceErrorKind::Payload, message)
    }

    pub fn fault<S: Into<String>>(category: Category, message: S) -> Self {
        Self::new(category, SourceErrorKind::Fault, message)
    }
}
