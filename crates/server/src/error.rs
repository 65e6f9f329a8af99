//! Server error type and HTTP mapping
//!
//! Every failure surfaced to a client goes through [`Error`], which
//! renders as `{"error": {"message": ...}}` with a mapped status code.
//! Framework default error pages never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Auth
    #[error("authentication required")]
    AuthMissingToken,
    #[error("invalid or expired session")]
    AuthInvalidSession,
    #[error("invalid email or password")]
    LoginFail,

    // Resource access
    #[error("not allowed to modify this resource")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already registered")]
    Duplicate(&'static str),

    // Requests
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid image name {0:?}")]
    InvalidImageName(String),

    // Infrastructure
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::AuthMissingToken | Error::AuthInvalidSession | Error::LoginFail => {
                StatusCode::UNAUTHORIZED
            }
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Duplicate(_) => StatusCode::CONFLICT,
            Error::BadRequest(_) | Error::InvalidImageName(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Hash(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(Error::AuthMissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::LoginFail.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn resource_errors_map_to_their_status() {
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::NotFound("post").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Duplicate("email").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::InvalidImageName("../x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
