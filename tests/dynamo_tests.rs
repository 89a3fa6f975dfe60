use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use captify::core::models::{ApiRequest, AwsCredentials, UserSession};
use captify::services::dynamo;
use serde_json::{Value, json};

fn dummy_credentials() -> AwsCredentials {
    AwsCredentials {
        access_key_id: "dummy_key".to_string(),
        secret_access_key: "dummy_secret".to_string(),
        session_token: None,
        region: "us-east-1".to_string(),
    }
}

fn session() -> UserSession {
    UserSession {
        user_id: "user123".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_invalid_operation_is_rejected_before_any_store_call() {
    let request = ApiRequest {
        service: Some("dynamo".to_string()),
        operation: Some("batchWrite".to_string()),
        table: Some("captify-core-User".to_string()),
        resource: None,
        data: json!({}),
    };

    let response = dynamo::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(
        error.contains("Invalid"),
        "Error should name the invalid operation: {error}"
    );
    for op in ["scan", "query", "get", "put", "update", "delete"] {
        assert!(error.contains(op), "Error should list valid operation {op}");
    }
    assert_eq!(response.metadata.source, "dynamo.execute");
}

#[tokio::test]
async fn test_missing_table_is_rejected() {
    let request = ApiRequest {
        service: Some("dynamo".to_string()),
        operation: Some("get".to_string()),
        table: None,
        resource: None,
        data: json!({ "key": { "userId": "user123" } }),
    };

    let response = dynamo::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Table name is required for DynamoDB operations")
    );
}

#[tokio::test]
async fn test_resource_field_substitutes_for_table() {
    // `resource` satisfies the table requirement, so validation proceeds to
    // payload parsing; a malformed payload then fails with a get-scoped
    // source rather than the router-level one.
    let request = ApiRequest {
        service: Some("dynamo".to_string()),
        operation: Some("get".to_string()),
        table: None,
        resource: Some("captify-core-User".to_string()),
        data: json!({}),
    };

    let response = dynamo::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert_eq!(response.metadata.source, "dynamo.get");
}

#[tokio::test]
async fn test_malformed_get_payload_fails_validation() {
    // Missing `key` entirely
    let request = ApiRequest {
        service: Some("dynamo".to_string()),
        operation: Some("get".to_string()),
        table: Some("captify-core-User".to_string()),
        resource: None,
        data: json!({ "something": "else" }),
    };

    let response = dynamo::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("Validation failed"));
}

#[test]
fn test_get_request_accepts_key_aliases() {
    let lower: dynamo::GetRequest =
        serde_json::from_value(json!({ "key": { "userId": "user123" } })).unwrap();
    let upper: dynamo::GetRequest =
        serde_json::from_value(json!({ "Key": { "userId": "user123" } })).unwrap();

    assert_eq!(lower.key.get("userId"), upper.key.get("userId"));
}

#[test]
fn test_put_request_item_is_optional() {
    let explicit: dynamo::PutRequest =
        serde_json::from_value(json!({ "item": { "userId": "user123" } })).unwrap();
    assert!(explicit.item.is_some());

    // No `item` field: the handler falls back to the whole payload.
    let fallback: dynamo::PutRequest =
        serde_json::from_value(json!({ "userId": "user123" })).unwrap();
    assert!(fallback.item.is_none());
}

#[test]
fn test_update_request_requires_update_expression() {
    let missing = serde_json::from_value::<dynamo::UpdateRequest>(json!({
        "key": { "userId": "user123" }
    }));
    assert!(missing.is_err());

    let parsed: dynamo::UpdateRequest = serde_json::from_value(json!({
        "key": { "userId": "user123" },
        "UpdateExpression": "SET email = :email",
        "ExpressionAttributeValues": { ":email": "new@example.com" }
    }))
    .unwrap();
    assert_eq!(parsed.update_expression, "SET email = :email");
    assert!(parsed.return_values.is_none());
}

#[test]
fn test_query_request_parses_pagination_fields() {
    let parsed: dynamo::QueryRequest = serde_json::from_value(json!({
        "KeyConditionExpression": "userId = :userId",
        "ExpressionAttributeValues": { ":userId": "user123" },
        "IndexName": "by-user",
        "Limit": 25,
        "ExclusiveStartKey": { "userId": "user122" },
        "ScanIndexForward": false
    }))
    .unwrap();

    assert_eq!(parsed.limit, Some(25));
    assert_eq!(parsed.scan_index_forward, Some(false));
    assert!(parsed.exclusive_start_key.is_some());
    assert_eq!(parsed.index_name.as_deref(), Some("by-user"));
}

#[test]
fn test_page_payload_shape_with_results() {
    let mut item = HashMap::new();
    item.insert(
        "userId".to_string(),
        AttributeValue::S("user123".to_string()),
    );
    let mut last_key = HashMap::new();
    last_key.insert(
        "userId".to_string(),
        AttributeValue::S("user123".to_string()),
    );

    let payload = dynamo::page_payload(vec![item], 1, 3, Some(last_key)).unwrap();

    assert_eq!(payload["count"], json!(1));
    assert_eq!(payload["scannedCount"], json!(3));
    assert_eq!(payload["items"], json!([{ "userId": "user123" }]));
    assert_eq!(payload["lastEvaluatedKey"], json!({ "userId": "user123" }));
}

#[test]
fn test_page_payload_shape_with_zero_matches() {
    // The shape is stable even when nothing matched.
    let payload = dynamo::page_payload(Vec::new(), 0, 0, None).unwrap();

    assert_eq!(payload["items"], json!([]));
    assert_eq!(payload["count"], json!(0));
    assert_eq!(payload["scannedCount"], json!(0));
    assert_eq!(payload["lastEvaluatedKey"], Value::Null);
}

#[test]
fn test_get_ops_lists_all_operations() {
    let ops = dynamo::get_ops();
    let operations = ops["operations"].as_array().unwrap();

    assert_eq!(operations.len(), 6);
    assert!(ops["examples"]["get"]["data"]["key"].is_object());
}
