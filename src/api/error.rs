use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - session expired or invalid")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    BadRequest(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Standard error envelope from the backend: `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Extract the human-readable message from an error body, falling back
    /// to the (truncated) raw body when it isn't the standard envelope.
    fn extract_message(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message {
                if !message.is_empty() {
                    return message;
                }
            }
        }
        Self::truncate_body(body)
    }

    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary so multibyte bodies cannot panic
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Message suitable for the inline error banner
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired. Please log in again.".to_string(),
            ApiError::RateLimited => "Server is busy. Please wait a moment and try again.".to_string(),
            ApiError::NetworkError(_) => "Unable to connect to server. Check your connection.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "{}"),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn test_extracts_message_envelope() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"message": "Resource 99 does not exist"}"#,
        );
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource 99 does not exist"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_falls_back_to_raw_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "plain text failure");
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "plain text failure"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncates_multibyte_bodies_on_char_boundary() {
        let mut body = "x".repeat(MAX_ERROR_BODY_LENGTH - 1);
        body.push('é'); // straddles the truncation point
        body.push_str(&"y".repeat(100));
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("truncated"));
                assert!(!msg.contains('é'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncates_long_bodies() {
        let body = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("truncated"));
                assert!(msg.len() < 600);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
