//! Response builders shared by the API handler.

use serde_json::{Value, json};

use crate::core::models::ApiResponse;

/// Returns a 200 OK response whose body is the serialized envelope.
#[must_use]
pub fn ok_envelope(envelope: &ApiResponse) -> Value {
    json!({
        "statusCode": 200,
        "body": serde_json::to_string(envelope).unwrap_or_else(|_| "{}".to_string())
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}
