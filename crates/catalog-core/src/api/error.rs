use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request rejected: {0}")]
    BadRequest(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 | 409 | 422 => ApiError::BadRequest(truncated),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True for the authorization failure that must end the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Short message suitable for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired. Please sign in again.".to_string(),
            ApiError::RateLimited => {
                "Server is busy. Please wait a moment and try again.".to_string()
            }
            ApiError::NetworkError(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::NetworkError(_) => "Network error. Check your connection.".to_string(),
            other => format!("Error: {}", other),
        }
    }
}

/// Find an `ApiError` anywhere in an `anyhow` chain.
pub fn find_api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ApiError>())
}

/// True if the error chain carries a 401.
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    find_api_error(err).is_some_and(ApiError::is_unauthorized)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(StatusCode::FORBIDDEN, "no"), ApiError::AccessDenied(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, ""), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), ApiError::RateLimited));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, ""), ApiError::ServerError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_REQUEST, ""), ApiError::BadRequest(_)));
        assert!(matches!(ApiError::from_status(StatusCode::IM_A_TEAPOT, ""), ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("truncated"));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }

    #[test]
    fn test_unauthorized_found_through_context() {
        let err = Err::<(), _>(ApiError::Unauthorized)
            .context("Failed to fetch authors")
            .unwrap_err();
        assert!(is_unauthorized(&err));

        let other = Err::<(), _>(ApiError::RateLimited)
            .context("Failed to fetch authors")
            .unwrap_err();
        assert!(!is_unauthorized(&other));
    }
}
