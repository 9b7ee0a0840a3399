//! The JSON envelope shared by every API endpoint.

use serde::{Deserialize, Serialize};

/// The body of every response from the `/api` routes.
///
/// Successful responses carry `data`, failed responses carry `error`. Both
/// carry a short human readable `message` summarising the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// The payload of a successful request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// What went wrong, for a failed request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// A summary of the outcome, e.g. "Transaction created successfully".
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: message.to_owned(),
        }
    }

    /// A failed response describing `error`.
    pub fn failure(error: String, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            message: message.to_owned(),
        }
    }
}
