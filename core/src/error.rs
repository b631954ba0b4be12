//! Error types for the put.io API client.
//!
//! # Design
//! Token-exchange failures get their own `Auth` variant so callers can tell
//! "the authorization code was rejected" apart from ordinary API failures.
//! Every other non-200 response lands in `Status`. Both carry the raw status
//! code and a message that already embeds it as `(#<status>)`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `PutioClient` and `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token endpoint answered with a status other than 200.
    #[error("{message}")]
    Auth { status: u16, message: String },

    /// Any other endpoint answered with a status other than 200.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The file to upload could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configured base URL is not a valid absolute URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// An argument or the base URL cannot be turned into a request URL.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A 200 response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status carried by `Auth` and `Status`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status, .. } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_failures() {
        let err = ApiError::Auth {
            status: 401,
            message: "Error granting authorization_code on code x. (#401)".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_auth());
        assert!(err.to_string().contains("401"));

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_auth());
    }

    #[test]
    fn io_error_names_the_path() {
        let err = ApiError::Io {
            path: PathBuf::from("/nope/movie.mkv"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/nope/movie.mkv"));
    }
}
