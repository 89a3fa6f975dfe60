//! Key-value store service.
//!
//! Routes generic `{operation, table, data}` requests to one DynamoDB call
//! per operation and normalizes the result into the response envelope.
//! `data` is parsed into a typed per-operation request before dispatch, so
//! callers cannot override structural fields such as the table name or key.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::aws::client_factory;
use crate::core::models::{ApiRequest, ApiResponse, AwsCredentials, UserSession};
use crate::errors::ServiceError;

const VALID_OPERATIONS: &[&str] = &["scan", "query", "get", "put", "update", "delete"];

/// Operation discovery descriptor for this service.
#[must_use]
pub fn get_ops() -> Value {
    json!({
        "operations": VALID_OPERATIONS,
        "description": "DynamoDB service for NoSQL database operations",
        "examples": {
            "get": {
                "operation": "get",
                "table": "captify-core-User",
                "data": { "key": { "userId": "user123" } }
            },
            "put": {
                "operation": "put",
                "table": "captify-core-User",
                "data": { "item": { "userId": "user123", "email": "user@example.com" } }
            },
            "scan": {
                "operation": "scan",
                "table": "captify-core-User",
                "data": {
                    "FilterExpression": "orgId = :orgId",
                    "ExpressionAttributeValues": { ":orgId": "org123" }
                }
            },
            "query": {
                "operation": "query",
                "table": "captify-core-User",
                "data": {
                    "KeyConditionExpression": "userId = :userId",
                    "ExpressionAttributeValues": { ":userId": "user123" }
                }
            },
            "update": {
                "operation": "update",
                "table": "captify-core-User",
                "data": {
                    "key": { "userId": "user123" },
                    "UpdateExpression": "SET email = :email",
                    "ExpressionAttributeValues": { ":email": "newemail@example.com" }
                }
            },
            "delete": {
                "operation": "delete",
                "table": "captify-core-User",
                "data": { "key": { "userId": "user123" } }
            }
        }
    })
}

/// Execute a DynamoDB operation. All key-value requests route through here.
///
/// Validation failures (unknown operation, missing table name, malformed
/// `data`) return a failure envelope without touching the store.
pub async fn execute(
    request: &ApiRequest,
    session: &UserSession,
    credentials: &AwsCredentials,
) -> ApiResponse {
    let operation = request.operation.as_deref().unwrap_or("scan");

    if !VALID_OPERATIONS.contains(&operation) {
        return ApiResponse::err(
            "dynamo.execute",
            format!(
                "Invalid DynamoDB operation: {operation}. Valid operations: {}",
                VALID_OPERATIONS.join(", ")
            ),
        );
    }

    let Some(table) = request.table_name() else {
        return ApiResponse::err(
            "dynamo.execute",
            "Table name is required for DynamoDB operations",
        );
    };

    info!(user_id = %session.user_id, operation, table, "dynamo request");

    let client = client_factory::dynamodb_client(credentials);

    match operation {
        "get" => wrap("dynamo.get", execute_get(&client, table, &request.data).await),
        "put" => wrap("dynamo.put", execute_put(&client, table, &request.data).await),
        "update" => wrap(
            "dynamo.update",
            execute_update(&client, table, &request.data).await,
        ),
        "delete" => wrap(
            "dynamo.delete",
            execute_delete(&client, table, &request.data).await,
        ),
        "query" => wrap(
            "dynamo.query",
            execute_query(&client, table, &request.data).await,
        ),
        "scan" => wrap(
            "dynamo.scan",
            execute_scan(&client, table, &request.data).await,
        ),
        // Unreachable: the allow-list above is exhaustive.
        other => ApiResponse::err("dynamo.execute", format!("Unsupported operation: {other}")),
    }
}

fn wrap(source: &str, result: Result<Value, ServiceError>) -> ApiResponse {
    match result {
        Ok(data) => ApiResponse::ok(source, data),
        Err(e) => {
            warn!(source, error = %e, "dynamo operation failed");
            ApiResponse::err(source, e.to_string())
        }
    }
}

/// Parse `data` into a typed per-operation request. An absent payload is
/// treated as an empty object so operations with no required fields work
/// without one.
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

#[derive(Debug, Deserialize)]
pub struct GetRequest {
    #[serde(alias = "Key")]
    pub key: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct PutRequest {
    #[serde(alias = "Item")]
    pub item: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(alias = "Key")]
    pub key: Map<String, Value>,
    #[serde(rename = "UpdateExpression")]
    pub update_expression: String,
    #[serde(rename = "ExpressionAttributeValues")]
    pub expression_attribute_values: Option<Map<String, Value>>,
    #[serde(rename = "ExpressionAttributeNames")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(rename = "ReturnValues")]
    pub return_values: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(alias = "Key")]
    pub key: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "KeyConditionExpression")]
    pub key_condition_expression: String,
    #[serde(rename = "FilterExpression")]
    pub filter_expression: Option<String>,
    #[serde(rename = "ExpressionAttributeValues")]
    pub expression_attribute_values: Option<Map<String, Value>>,
    #[serde(rename = "ExpressionAttributeNames")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(rename = "IndexName")]
    pub index_name: Option<String>,
    #[serde(rename = "Limit")]
    pub limit: Option<i32>,
    #[serde(rename = "ExclusiveStartKey")]
    pub exclusive_start_key: Option<Map<String, Value>>,
    #[serde(rename = "ScanIndexForward")]
    pub scan_index_forward: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "FilterExpression")]
    pub filter_expression: Option<String>,
    #[serde(rename = "ExpressionAttributeValues")]
    pub expression_attribute_values: Option<Map<String, Value>>,
    #[serde(rename = "ExpressionAttributeNames")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(rename = "IndexName")]
    pub index_name: Option<String>,
    #[serde(rename = "Limit")]
    pub limit: Option<i32>,
    #[serde(rename = "ExclusiveStartKey")]
    pub exclusive_start_key: Option<Map<String, Value>>,
}

// ============================================================================
// Per-operation handlers
// ============================================================================

async fn execute_get(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: GetRequest = parse(data)?;
    let key: HashMap<String, AttributeValue> = to_item(&req.key)?;

    let output = client
        .get_item()
        .table_name(table)
        .set_key(Some(key))
        .send()
        .await?;

    match output.item {
        Some(item) => Ok(from_item(item)?),
        None => Ok(Value::Null),
    }
}

async fn execute_put(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: PutRequest = parse(data)?;

    // Fall back to the whole payload when no explicit `item` is given.
    let item_map = match req.item {
        Some(map) => map,
        None => data.as_object().cloned().ok_or_else(|| {
            ServiceError::Validation("Item is required for put operations".to_string())
        })?,
    };

    let item: HashMap<String, AttributeValue> = to_item(&item_map)?;

    client
        .put_item()
        .table_name(table)
        .set_item(Some(item))
        .send()
        .await?;

    Ok(json!({ "message": "Item created successfully" }))
}

async fn execute_update(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: UpdateRequest = parse(data)?;
    let key: HashMap<String, AttributeValue> = to_item(&req.key)?;

    let return_values = req.return_values.as_deref().unwrap_or("ALL_NEW");
    let mut call = client
        .update_item()
        .table_name(table)
        .set_key(Some(key))
        .update_expression(&req.update_expression)
        .return_values(ReturnValue::from(return_values));

    if let Some(values) = &req.expression_attribute_values {
        call = call.set_expression_attribute_values(Some(to_item(values)?));
    }
    if let Some(names) = &req.expression_attribute_names {
        call = call.set_expression_attribute_names(Some(names.clone()));
    }

    let output = call.send().await?;

    match output.attributes {
        Some(attributes) => Ok(from_item(attributes)?),
        None => Ok(json!({ "message": "Item updated successfully" })),
    }
}

async fn execute_delete(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: DeleteRequest = parse(data)?;
    let key: HashMap<String, AttributeValue> = to_item(&req.key)?;

    // Unconditional delete: removing an absent key is not an error.
    let output = client
        .delete_item()
        .table_name(table)
        .set_key(Some(key))
        .return_values(ReturnValue::AllOld)
        .send()
        .await?;

    match output.attributes {
        Some(attributes) => Ok(from_item(attributes)?),
        None => Ok(json!({ "message": "Item deleted successfully" })),
    }
}

async fn execute_query(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: QueryRequest = parse(data)?;

    let mut call = client
        .query()
        .table_name(table)
        .key_condition_expression(&req.key_condition_expression);

    if let Some(filter) = &req.filter_expression {
        call = call.filter_expression(filter);
    }
    if let Some(values) = &req.expression_attribute_values {
        call = call.set_expression_attribute_values(Some(to_item(values)?));
    }
    if let Some(names) = &req.expression_attribute_names {
        call = call.set_expression_attribute_names(Some(names.clone()));
    }
    if let Some(index) = &req.index_name {
        call = call.index_name(index);
    }
    if let Some(limit) = req.limit {
        call = call.limit(limit);
    }
    if let Some(start_key) = &req.exclusive_start_key {
        call = call.set_exclusive_start_key(Some(to_item(start_key)?));
    }
    if let Some(forward) = req.scan_index_forward {
        call = call.scan_index_forward(forward);
    }

    let output = call.send().await?;
    page_payload(
        output.items.unwrap_or_default(),
        output.count,
        output.scanned_count,
        output.last_evaluated_key,
    )
}

async fn execute_scan(
    client: &DynamoDbClient,
    table: &str,
    data: &Value,
) -> Result<Value, ServiceError> {
    let req: ScanRequest = parse(data)?;

    let mut call = client.scan().table_name(table);

    if let Some(filter) = &req.filter_expression {
        call = call.filter_expression(filter);
    }
    if let Some(values) = &req.expression_attribute_values {
        call = call.set_expression_attribute_values(Some(to_item(values)?));
    }
    if let Some(names) = &req.expression_attribute_names {
        call = call.set_expression_attribute_names(Some(names.clone()));
    }
    if let Some(index) = &req.index_name {
        call = call.index_name(index);
    }
    if let Some(limit) = req.limit {
        call = call.limit(limit);
    }
    if let Some(start_key) = &req.exclusive_start_key {
        call = call.set_exclusive_start_key(Some(to_item(start_key)?));
    }

    let output = call.send().await?;
    page_payload(
        output.items.unwrap_or_default(),
        output.count,
        output.scanned_count,
        output.last_evaluated_key,
    )
}

/// Normalize a query/scan page into the envelope payload. The pagination
/// token is opaque; callers echo it back as `ExclusiveStartKey` to continue.
pub fn page_payload(
    items: Vec<HashMap<String, AttributeValue>>,
    count: i32,
    scanned_count: i32,
    last_evaluated_key: Option<HashMap<String, AttributeValue>>,
) -> Result<Value, ServiceError> {
    let items: Vec<Value> = from_items(items)?;
    let last_key: Value = match last_evaluated_key {
        Some(key) => from_item(key)?,
        None => Value::Null,
    };

    Ok(json!({
        "items": items,
        "count": count,
        "scannedCount": scanned_count,
        "lastEvaluatedKey": last_key,
    }))
}
