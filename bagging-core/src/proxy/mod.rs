//! # Backend Proxy
//!
//! HTTP server that stands between the browser front end and the training
//! backend. `/api/datasets` is a plain pass-through that reports failures;
//! `/api/train-model` answers with synthetic demo results whenever the
//! backend cannot, so the walkthrough keeps working offline.

mod server;

pub use server::{ProxyState, SharedProxy, router as proxy_router, run as run_proxy};

use serde::{Deserialize, Serialize};

/// Error message returned when the backend cannot be used.
pub const BACKEND_UNAVAILABLE: &str = "Cannot connect to ML backend";

/// Error message returned for any method other than POST on a proxied route.
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// JSON error body: `{ "error": ..., "details": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_omits_missing_details() {
        let body = ErrorBody::new(METHOD_NOT_ALLOWED);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Method not allowed"})
        );
    }

    #[test]
    fn test_error_body_with_details() {
        let body = ErrorBody::new(BACKEND_UNAVAILABLE).with_details("connection refused");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "Cannot connect to ML backend");
        assert_eq!(value["details"], "connection refused");
    }
}
