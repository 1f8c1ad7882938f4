//! Quiz error types.
//!
//! Every variant is recoverable at the HTTP boundary: handlers convert them
//! into a status code plus a small JSON body. None is fatal to the process.
//! Note that running out of unanswered questions is NOT an error (see
//! `session::BlockStart::AllAnswered`), and malformed question lines are
//! skipped at load time without surfacing anything.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors produced by the core quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Registration with a pseudo that is already taken.
    #[error("pseudo already taken: {0}")]
    DuplicateRegistration(String),

    /// Unknown pseudo or wrong password. Deliberately not distinguished.
    #[error("unknown pseudo or wrong password")]
    InvalidCredential,

    /// Registration input rejected: empty pseudo/password, or a pseudo
    /// longer than the accepted maximum.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    /// An operation that needs an `InProgress` quiz block was called without one.
    #[error("no quiz block in progress")]
    SessionNotActive,

    /// A second `start` was issued while a block is already `InProgress`.
    #[error("a quiz block is already in progress")]
    SessionAlreadyActive,

    /// Persistence failure (file I/O or JSON encoding).
    #[error("storage error: {0}")]
    Storage(String),
}

impl QuizError {
    fn status(&self) -> StatusCode {
        match self {
            QuizError::DuplicateRegistration(_) => StatusCode::CONFLICT,
            QuizError::InvalidCredential => StatusCode::UNAUTHORIZED,
            QuizError::InvalidRegistration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuizError::SessionNotActive => StatusCode::BAD_REQUEST,
            QuizError::SessionAlreadyActive => StatusCode::CONFLICT,
            QuizError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for QuizError {
    fn from(e: std::io::Error) -> Self {
        QuizError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(e: serde_json::Error) -> Self {
        QuizError::Storage(e.to_string())
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(
            QuizError::Storage("disk full".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            QuizError::DuplicateRegistration("bob".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(QuizError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(QuizError::SessionNotActive.status(), StatusCode::BAD_REQUEST);
    }
}
