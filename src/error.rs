//! Error types for jansewa.

use thiserror::Error;

use crate::model::{Action, ApplicationStatus};

#[derive(Debug, Error)]
pub enum Error {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("cannot {action} an application in status {from}")]
    InvalidTransition {
        from: ApplicationStatus,
        action: Action,
    },

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP-style status category for callers that map errors to responses.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Unauthorized(_) => 401,
            Error::Forbidden(_) => 403,
            Error::InvalidTransition { .. } => 409,
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::Config(_) | Error::Storage(_) | Error::Other(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(Error::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(Error::Forbidden("x".into()).status_code(), 403);
        assert_eq!(
            Error::InvalidTransition {
                from: ApplicationStatus::Validated,
                action: Action::Validate,
            }
            .status_code(),
            409
        );
        assert_eq!(Error::Validation("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::Other("x".into()).status_code(), 500);
    }

    #[test]
    fn invalid_transition_names_action_and_status() {
        let err = Error::InvalidTransition {
            from: ApplicationStatus::Validated,
            action: Action::Validate,
        };
        assert_eq!(
            err.to_string(),
            "cannot validate an application in status validated"
        );
    }
}
