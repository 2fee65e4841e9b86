//! Error types for the request client
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Client Error Enum ==
/// Failure of a request made through the request client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport-level failure (DNS, refused connection, reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The attempt did not settle within its time budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream answered with a non-2xx status
    #[error("HTTP error! status: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Network errors, timeouts, 5xx, 408 and 429 are retried. Other 4xx
    /// and decode failures will fail again the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout(_) => true,
            ClientError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            ClientError::Decode(_) | ClientError::InvalidRequest(_) => false,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let status = match &self {
            ClientError::Network(_) => StatusCode::BAD_GATEWAY,
            ClientError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ClientError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ClientError::Decode(_) => StatusCode::BAD_GATEWAY,
            ClientError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request client.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use proptest::prelude::*;

    fn status(code: u16) -> ClientError {
        ClientError::Status {
            status: code,
            status_text: "x".to_string(),
        }
    }

    #[test]
    fn test_status_message_embeds_code_and_text() {
        let err = ClientError::Status {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 503 Service Unavailable");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Network("refused".to_string()).is_retryable());
        assert!(ClientError::Timeout(Duration::from_secs(10)).is_retryable());
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(408).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!ClientError::Decode("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ClientError::Network("x".to_string()), StatusCode::BAD_GATEWAY),
            (ClientError::Timeout(Duration::from_secs(1)), StatusCode::GATEWAY_TIMEOUT),
            (status(404), StatusCode::NOT_FOUND),
            (status(503), StatusCode::SERVICE_UNAVAILABLE),
            (ClientError::Decode("x".to_string()), StatusCode::BAD_GATEWAY),
            (ClientError::InvalidRequest("x".to_string()), StatusCode::BAD_REQUEST),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        // Every error renders as JSON with a string "error" field carrying
        // the display message.
        #[test]
        fn prop_error_response_format(msg in "[a-zA-Z0-9 _-]{1,100}", code in 400u16..600) {
            let variants = vec![
                ClientError::Network(msg.clone()),
                ClientError::Decode(msg.clone()),
                ClientError::InvalidRequest(msg.clone()),
                ClientError::Status { status: code, status_text: msg.clone() },
            ];

            let rt = tokio::runtime::Runtime::new().unwrap();
            for error in variants {
                let expected = error.to_string();
                let response = error.into_response();

                let content_type = response
                    .headers()
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                prop_assert!(content_type.contains("application/json"));

                let bytes = rt.block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
                let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                prop_assert_eq!(json["error"].as_str(), Some(expected.as_str()));
            }
        }
    }
}
