//! Object store service.
//!
//! Routes generic `{operation, data}` requests to one S3 call per operation.
//! The bucket and object key travel in `data`; as in the key-value domain,
//! `data` is parsed into a typed per-operation request before dispatch.

use std::collections::HashMap;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::aws::client_factory;
use crate::core::models::{ApiRequest, ApiResponse, AwsCredentials, UserSession};
use crate::errors::ServiceError;

const VALID_OPERATIONS: &[&str] = &["get", "put", "delete", "list"];

/// Operation discovery descriptor for this service.
#[must_use]
pub fn get_ops() -> Value {
    json!({
        "operations": VALID_OPERATIONS,
        "description": "S3 service for object storage operations",
        "examples": {
            "get": {
                "operation": "get",
                "data": { "bucket": "captify-uploads", "key": "user123/document.pdf" }
            },
            "put": {
                "operation": "put",
                "data": {
                    "bucket": "captify-uploads",
                    "key": "user123/document.pdf",
                    "body": "file content",
                    "contentType": "application/pdf"
                }
            },
            "delete": {
                "operation": "delete",
                "data": { "bucket": "captify-uploads", "key": "user123/document.pdf" }
            },
            "list": {
                "operation": "list",
                "data": { "bucket": "captify-uploads", "prefix": "user123/" }
            }
        }
    })
}

/// Execute an S3 operation. All object-store requests route through here.
///
/// Validation failures (unknown operation, missing bucket or key) return a
/// failure envelope without touching the store.
pub async fn execute(
    request: &ApiRequest,
    session: &UserSession,
    credentials: &AwsCredentials,
) -> ApiResponse {
    let operation = request.operation.as_deref().unwrap_or("get");

    if !VALID_OPERATIONS.contains(&operation) {
        return ApiResponse::err(
            "s3.execute",
            format!(
                "Invalid S3 operation: {operation}. Valid operations: {}",
                VALID_OPERATIONS.join(", ")
            ),
        );
    }

    let bucket = match parse::<BucketScope>(&request.data) {
        Ok(scope) => scope.bucket,
        Err(e) => return ApiResponse::err("s3.execute", e.to_string()),
    };
    let Some(bucket) = bucket.filter(|b| !b.is_empty()) else {
        return ApiResponse::err("s3.execute", "Bucket is required for S3 operations");
    };

    info!(user_id = %session.user_id, operation, bucket = %bucket, "s3 request");

    let client = client_factory::s3_client(credentials);

    match operation {
        "get" => wrap("s3.get", execute_get(&client, &bucket, &request.data).await),
        "put" => wrap("s3.put", execute_put(&client, &bucket, &request.data).await),
        "delete" => wrap(
            "s3.delete",
            execute_delete(&client, &bucket, &request.data).await,
        ),
        "list" => wrap(
            "s3.list",
            execute_list(&client, &bucket, &request.data).await,
        ),
        // Unreachable: the allow-list above is exhaustive.
        other => ApiResponse::err("s3.execute", format!("Unsupported operation: {other}")),
    }
}

fn wrap(source: &str, result: Result<Value, ServiceError>) -> ApiResponse {
    match result {
        Ok(data) => ApiResponse::ok(source, data),
        Err(e) => {
            warn!(source, error = %e, "s3 operation failed");
            ApiResponse::err(source, e.to_string())
        }
    }
}

/// Parse `data` into a typed per-operation request; an absent payload parses
/// as empty.
fn parse<T: DeserializeOwned>(data: &Value) -> Result<T, ServiceError> {
    let data = if data.is_null() {
        Value::Object(Map::new())
    } else {
        data.clone()
    };
    serde_json::from_value(data).map_err(|e| ServiceError::Validation(e.to_string()))
}

// ============================================================================
// Typed per-operation requests
// ============================================================================

/// Bucket extraction shared by every operation; validated before dispatch.
#[derive(Debug, Deserialize)]
struct BucketScope {
    bucket: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRequest {
    pub key: Option<String>,
    pub body: Option<String>,
    pub content_type: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub prefix: Option<String>,
    pub max_keys: Option<i32>,
    pub continuation_token: Option<String>,
}

fn require_key(key: Option<&str>, operation: &str) -> Result<String, ServiceError> {
    key.filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ServiceError::Validation(format!("Key is required for S3 {operation} operation"))
        })
}

// ============================================================================
// Per-operation handlers
// ============================================================================

async fn execute_get(client: &S3Client, bucket: &str, data: &Value) -> Result<Value, ServiceError> {
    let req: GetRequest = parse(data)?;
    let key = require_key(req.key.as_deref(), "GET")?;

    let output = client.get_object().bucket(bucket).key(&key).send().await?;

    let content_type = output.content_type.clone();
    let content_length = output.content_length;
    let last_modified = output.last_modified.map(|t| t.to_string());
    let etag = output.e_tag.clone();
    let metadata = output.metadata.clone();

    let bytes = output
        .body
        .collect()
        .await
        .map_err(|e| ServiceError::Aws(e.to_string()))?
        .into_bytes();
    let body = String::from_utf8_lossy(&bytes).into_owned();

    Ok(json!({
        "body": body,
        "contentType": content_type,
        "contentLength": content_length,
        "lastModified": last_modified,
        "etag": etag,
        "metadata": metadata,
    }))
}

async fn execute_put(client: &S3Client, bucket: &str, data: &Value) -> Result<Value, ServiceError> {
    let req: PutRequest = parse(data)?;
    let key = require_key(req.key.as_deref(), "PUT")?;

    let mut call = client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(
            req.body.unwrap_or_default().into_bytes(),
        ));

    if let Some(content_type) = &req.content_type {
        call = call.content_type(content_type);
    }
    if let Some(metadata) = &req.metadata {
        call = call.set_metadata(Some(metadata.clone()));
    }

    let output = call.send().await?;

    Ok(json!({
        "etag": output.e_tag,
        "location": object_location(bucket, &key),
    }))
}

/// Public-style object URL echoed back after a put.
#[must_use]
pub fn object_location(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

async fn execute_delete(
    client: &S3Client,
    bucket: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: DeleteRequest = parse(data)?;
    let key = require_key(req.key.as_deref(), "DELETE")?;

    // Unconditional delete: removing an absent key is not an error.
    client
        .delete_object()
        .bucket(bucket)
        .key(&key)
        .send()
        .await?;

    Ok(json!({ "message": "Object deleted successfully" }))
}

async fn execute_list(
    client: &S3Client,
    bucket: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: ListRequest = parse(data)?;

    let mut call = client
        .list_objects_v2()
        .bucket(bucket)
        .max_keys(req.max_keys.unwrap_or(1000));

    if let Some(prefix) = &req.prefix {
        call = call.prefix(prefix);
    }
    if let Some(token) = &req.continuation_token {
        call = call.continuation_token(token);
    }

    let output = call.send().await?;

    let objects: Vec<Value> = output
        .contents
        .unwrap_or_default()
        .into_iter()
        .map(|object| {
            json!({
                "key": object.key,
                "size": object.size,
                "lastModified": object.last_modified.map(|t| t.to_string()),
                "etag": object.e_tag,
            })
        })
        .collect();

    Ok(list_payload(
        objects,
        output.key_count.unwrap_or(0),
        output.is_truncated.unwrap_or(false),
        output.next_continuation_token,
        output.prefix,
    ))
}

/// Normalize a list page into the envelope payload. The continuation token
/// is opaque; callers echo it back as `continuationToken` to continue.
#[must_use]
pub fn list_payload(
    objects: Vec<Value>,
    count: i32,
    is_truncated: bool,
    next_continuation_token: Option<String>,
    prefix: Option<String>,
) -> Value {
    json!({
        "objects": objects,
        "count": count,
        "isTruncated": is_truncated,
        "nextContinuationToken": next_continuation_token,
        "prefix": prefix,
    })
}
