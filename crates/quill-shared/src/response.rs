//! The response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{status, result}` wrapper around every payload, success or error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub result: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            result,
        }
    }
}

/// Error payload. `code` is reserved for application error codes and is
/// currently always `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: Option<String>,

    #[serde(rename = "type")]
    pub error_type: String,

    pub message: String,
}

pub type ErrorResponse = ApiResponse<ErrorBody>;

impl ApiResponse<ErrorBody> {
    pub fn error(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            result: ErrorBody {
                code: None,
                error_type: error_type.into(),
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let json = serde_json::to_value(ErrorResponse::error("VALIDATION_ERROR", "bad")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "ERROR",
                "result": {"code": null, "type": "VALIDATION_ERROR", "message": "bad"}
            })
        );
    }

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(1)).unwrap();

        assert_eq!(json, serde_json::json!({"status": "SUCCESS", "result": 1}));
    }
}
