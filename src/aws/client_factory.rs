//! Store client construction.
//!
//! Every service call builds a fresh client from the credentials it was
//! handed; nothing is pooled or cached across calls.

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client as S3Client;

use crate::core::models::AwsCredentials;

/// Build a DynamoDB client from explicit short-lived credentials.
#[must_use]
pub fn dynamodb_client(credentials: &AwsCredentials) -> DynamoDbClient {
    let provider = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        None,
        "captify",
    );

    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(credentials.region.clone()))
        .credentials_provider(provider)
        .build();

    DynamoDbClient::from_conf(config)
}

/// Build a DynamoDB client from the ambient environment (service-account
/// fallback when no session credentials are available).
pub async fn dynamodb_client_from_env() -> DynamoDbClient {
    let shared_config = aws_config::from_env().load().await;
    DynamoDbClient::new(&shared_config)
}

/// Build an S3 client from explicit short-lived credentials.
#[must_use]
pub fn s3_client(credentials: &AwsCredentials) -> S3Client {
    let provider = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        None,
        "captify",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(credentials.region.clone()))
        .credentials_provider(provider)
        .build();

    S3Client::from_conf(config)
}
