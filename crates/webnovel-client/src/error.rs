use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] reqwest::Error),
    #[error("You are not authorized to perform this action. Please log in.")]
    Unauthorized,
    #[error("The requested resource was not found.")]
    NotFound,
    #[error("Server error. Please try again later.")]
    Server { status: u16 },
    #[error("Please check your input and try again. {0}")]
    Validation(#[from] webnovel_lib::error::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Something went wrong. Please try again.")]
    Decode(#[from] serde_json::Error),
    #[error("expected an EPUB file, got {0}")]
    UnexpectedContent(String),
    #[error("failed to build http client: {0}")]
    Builder(#[source] reqwest::Error),
}

pub type ApiError = Error;

/// Error bodies as the content service writes them. FastAPI puts validation
/// failures in a `detail` list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        let detail = self.detail.and_then(|detail| match detail {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        });

        detail
            .or(self.message)
            .or(self.error)
            .filter(|msg| !msg.trim().is_empty())
    }
}

impl Error {
    /// Maps a non-success status to an error. 401 is handled by the client
    /// before this is reached because it also ends the session.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }
        if status == StatusCode::NOT_FOUND {
            return Error::NotFound;
        }
        if status.is_server_error() {
            return Error::Server {
                status: status.as_u16(),
            };
        }

        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Server { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized => Some(401),
            Error::NotFound => Some(404),
            Error::Server { status } | Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_response(StatusCode::NOT_FOUND, b""),
            Error::NotFound
        ));
        assert!(matches!(
            Error::from_response(StatusCode::BAD_GATEWAY, b"<html>"),
            Error::Server { status: 502 }
        ));
        assert_eq!(
            Error::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"").to_string(),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_detail_message() {
        let err = Error::from_response(
            StatusCode::CONFLICT,
            br#"{"detail":"Novel with this source URL already exists"}"#,
        );
        assert_eq!(err.to_string(), "Novel with this source URL already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_validation_detail_list() {
        let err = Error::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail":[{"loc":["query","page"],"msg":"ensure this value is greater than or equal to 1"}]}"#,
        );
        assert_eq!(
            err.to_string(),
            "ensure this value is greater than or equal to 1"
        );
    }

    #[test]
    fn test_fallback_message() {
        let err = Error::from_response(StatusCode::BAD_REQUEST, b"not json");
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);

        let err = Error::from_response(StatusCode::BAD_REQUEST, br#"{"error":"bad range"}"#);
        assert_eq!(err.to_string(), "bad range");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::Server { status: 503 }.is_retryable());
        assert!(!Error::NotFound.is_retryable());
        assert!(!Error::Unauthorized.is_retryable());
    }
}
