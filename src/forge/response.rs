//! Tagged response shape returned by every remote client call.
use serde_json::Value;

use crate::error::PropagatorError;

/// Outcome of a request that reached the server.
///
/// Transport failures (connection errors, an unparsable success body) are
/// not represented here; they surface as the `Err` side of the surrounding
/// `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The server answered with the success status expected for the method.
    Ok(Value),
    /// Any other status, with the raw body as returned by the server.
    Unexpected { status: u16, body: String },
}

impl ApiResponse {
    /// `message` field of a JSON error body, if there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            ApiResponse::Ok(_) => None,
            ApiResponse::Unexpected { body, .. } => {
                serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v["message"].as_str().map(str::to_string))
            }
        }
    }

    /// Unwrap the success body or convert the marker into an error naming
    /// the endpoint it came from.
    pub fn into_value(self, endpoint: &str) -> Result<Value, PropagatorError> {
        match self {
            ApiResponse::Ok(value) => Ok(value),
            ApiResponse::Unexpected { status, body } => {
                Err(PropagatorError::unexpected(endpoint, status, body))
            }
        }
    }
}
