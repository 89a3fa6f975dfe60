/// Captify services - the backend service layer for the Captify platform.
///
/// Every service domain follows the same operation-router pattern: validate
/// the inbound `{service, operation, table, data}` request against a fixed
/// allow-list, dispatch to one handler per operation, invoke the matching
/// store call, and wrap the outcome in a uniform
/// `{success, data|error, metadata}` envelope.
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - DynamoDB for key-value and chat record storage
/// - S3 for object storage
/// - A Neptune/Gremlin endpoint for the ontology graph
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use captify::core::models::{ApiRequest, AwsCredentials, UserSession};
/// use captify::services;
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     captify::setup_logging();
///
///     let request = ApiRequest {
///         service: Some("dynamo".to_string()),
///         operation: Some("get".to_string()),
///         table: Some("captify-core-User".to_string()),
///         resource: None,
///         data: json!({ "key": { "userId": "user123" } }),
///     };
///
///     let session = UserSession {
///         user_id: "user123".to_string(),
///         ..Default::default()
///     };
///
///     let credentials = AwsCredentials {
///         access_key_id: "dummy_key".to_string(),
///         secret_access_key: "dummy_secret".to_string(),
///         session_token: None,
///         region: "us-east-1".to_string(),
///     };
///
///     let response = services::execute(&request, &session, &credentials).await;
///     println!("success: {}", response.success);
/// }
/// ```
// Module declarations
pub mod api;
pub mod aws;
pub mod core;
pub mod errors;
pub mod graph;
pub mod services;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called at the start of each
/// Lambda handler.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
