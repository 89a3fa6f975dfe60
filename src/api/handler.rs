//! API Lambda handler - thin adapter over the service router.
//!
//! Extracts the request body, resolves credentials for the caller's session,
//! runs the service router, and returns the envelope as a JSON response.

use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::helpers;
use crate::core::models::{ApiRequest, UserSession};
use crate::services;

pub use self::function_handler as handler;

/// Body shape posted to the API: the generic service request plus the
/// caller's session as supplied by the identity provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody {
    #[serde(flatten)]
    request: ApiRequest,
    user_session: Option<UserSession>,
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails the invocation: malformed requests and service failures all
/// surface as JSON response payloads.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<impl Serialize, Error> {
    info!("API Lambda received request");

    let body = match extract_body(&event.payload) {
        Ok(b) => b,
        Err(response) => return Ok(response),
    };

    let parsed: RequestBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Failed to parse request body: {}", e);
            return Ok(helpers::err_response(400, &format!("Parse Error: {e}")));
        }
    };

    let Some(session) = parsed.user_session else {
        error!("Request missing user session");
        return Ok(helpers::err_response(401, "User session is required"));
    };

    let credentials = match services::resolve_credentials(&session) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Credential resolution failed: {}", e);
            return Ok(helpers::err_response(500, &e.to_string()));
        }
    };

    let envelope = services::execute(&parsed.request, &session, &credentials).await;
    Ok(helpers::ok_envelope(&envelope))
}

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}
