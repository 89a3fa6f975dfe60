use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Operation not implemented: {0}")]
    NotImplemented(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),

    #[error("Failed to execute graph query: {0}")]
    Graph(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Failed to serialize or deserialize data: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Serialization(error.to_string())
    }
}

impl From<serde_dynamo::Error> for ServiceError {
    fn from(error: serde_dynamo::Error) -> Self {
        ServiceError::Serialization(error.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        ServiceError::Http(error.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(error: anyhow::Error) -> Self {
        ServiceError::Aws(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E, R> From<SdkError<E, R>> for ServiceError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        ServiceError::Aws(DisplayErrorContext(&error).to_string())
    }
}
