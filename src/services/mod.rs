//! Service routing.
//!
//! The top-level router validates the request shape, resolves credentials,
//! and hands the request to one service domain. Every outcome, success or
//! failure, is an [`ApiResponse`] envelope; nothing is re-thrown to callers.

pub mod chat;
pub mod dynamo;
pub mod s3;

use std::env;

use crate::core::models::{ApiRequest, ApiResponse, AwsCredentials, UserSession};
use crate::errors::ServiceError;

/// Route a request to its service domain.
///
/// `getOps` is a discovery operation answered here for any known service;
/// everything else dispatches to the domain's own `execute`.
pub async fn execute(
    request: &ApiRequest,
    session: &UserSession,
    credentials: &AwsCredentials,
) -> ApiResponse {
    let Some(service) = request.service.as_deref() else {
        return ApiResponse::err("services.execute", "Service is required");
    };

    if request.operation.as_deref() == Some("getOps") {
        return get_service_ops(service);
    }

    match service.to_lowercase().as_str() {
        "dynamo" | "dynamodb" => dynamo::execute(request, session, credentials).await,
        "s3" => s3::execute(request, session, credentials).await,
        "chat" => chat::execute(request, session, credentials).await,
        other => ApiResponse::err("services.execute", format!("Unknown service: {other}")),
    }
}

/// Operation discovery for a service domain.
#[must_use]
pub fn get_service_ops(service: &str) -> ApiResponse {
    match service.to_lowercase().as_str() {
        "dynamo" | "dynamodb" => ApiResponse::ok("services.getOps", dynamo::get_ops()),
        "s3" => ApiResponse::ok("services.getOps", s3::get_ops()),
        "chat" => ApiResponse::ok("services.getOps", chat::get_ops()),
        other => ApiResponse::err("services.getOps", format!("Unknown service: {other}")),
    }
}

/// Resolve AWS credentials for a session.
///
/// Tier 1: the session's short-lived token paired with the service account
/// keys. Tier 2: the service account keys alone.
///
/// # Errors
///
/// Returns a validation error when no service account keys are configured.
pub fn resolve_credentials(session: &UserSession) -> Result<AwsCredentials, ServiceError> {
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let access_key_id = env::var("AWS_ACCESS_KEY_ID")
        .map_err(|_| ServiceError::Validation("AWS credentials not available".to_string()))?;
    let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY")
        .map_err(|_| ServiceError::Validation("AWS credentials not available".to_string()))?;

    // The session token is only trusted alongside a verified identity token.
    let session_token = if session.id_token.is_some() {
        session.aws_session_token.clone()
    } else {
        None
    };

    Ok(AwsCredentials {
        access_key_id,
        secret_access_key,
        session_token,
        region,
    })
}
