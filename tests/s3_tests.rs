use captify::core::models::{ApiRequest, AwsCredentials, UserSession};
use captify::services::s3;
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
        service: Some("s3".to_string()),
        operation: Some("copy".to_string()),
        table: None,
        resource: None,
        data: json!({ "bucket": "captify-uploads" }),
    };

    let response = s3::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(error.contains("Invalid"));
    for op in ["get", "put", "delete", "list"] {
        assert!(error.contains(op), "Error should list valid operation {op}");
    }
    assert_eq!(response.metadata.source, "s3.execute");
}

#[tokio::test]
async fn test_missing_bucket_is_rejected() {
    let request = ApiRequest {
        service: Some("s3".to_string()),
        operation: Some("get".to_string()),
        table: None,
        resource: None,
        data: json!({ "key": "user123/document.pdf" }),
    };

    let response = s3::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Bucket is required for S3 operations")
    );
    assert_eq!(response.metadata.source, "s3.execute");
}

#[tokio::test]
async fn test_get_without_key_fails_with_operation_scoped_error() {
    let request = ApiRequest {
        service: Some("s3".to_string()),
        operation: Some("get".to_string()),
        table: None,
        resource: None,
        data: json!({ "bucket": "captify-uploads" }),
    };

    let response = s3::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert!(
        response
            .error
            .unwrap()
            .contains("Key is required for S3 GET operation")
    );
    assert_eq!(response.metadata.source, "s3.get");
}

#[tokio::test]
async fn test_delete_without_key_fails_with_operation_scoped_error() {
    let request = ApiRequest {
        service: Some("s3".to_string()),
        operation: Some("delete".to_string()),
        table: None,
        resource: None,
        data: json!({ "bucket": "captify-uploads", "key": "" }),
    };

    let response = s3::execute(&request, &session(), &dummy_credentials()).await;

    assert!(!response.success);
    assert!(
        response
            .error
            .unwrap()
            .contains("Key is required for S3 DELETE operation")
    );
    assert_eq!(response.metadata.source, "s3.delete");
}

#[test]
fn test_put_request_parses_camel_case_fields() {
    let parsed: s3::PutRequest = serde_json::from_value(json!({
        "bucket": "captify-uploads",
        "key": "user123/document.pdf",
        "body": "file content",
        "contentType": "application/pdf",
        "metadata": { "owner": "user123" }
    }))
    .unwrap();

    assert_eq!(parsed.key.as_deref(), Some("user123/document.pdf"));
    assert_eq!(parsed.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(
        parsed.metadata.unwrap().get("owner").map(String::as_str),
        Some("user123")
    );
}

#[test]
fn test_list_request_fields_are_all_optional() {
    let parsed: s3::ListRequest = serde_json::from_value(json!({
        "bucket": "captify-uploads",
        "prefix": "user123/",
        "maxKeys": 100,
        "continuationToken": "token123"
    }))
    .unwrap();
    assert_eq!(parsed.prefix.as_deref(), Some("user123/"));
    assert_eq!(parsed.max_keys, Some(100));
    assert_eq!(parsed.continuation_token.as_deref(), Some("token123"));

    let empty: s3::ListRequest = serde_json::from_value(json!({})).unwrap();
    assert!(empty.prefix.is_none());
    assert!(empty.max_keys.is_none());
}

#[test]
fn test_object_location_names_bucket_and_key() {
    assert_eq!(
        s3::object_location("captify-uploads", "user123/document.pdf"),
        "https://captify-uploads.s3.amazonaws.com/user123/document.pdf"
    );
}

#[test]
fn test_list_payload_shape() {
    let payload = s3::list_payload(
        vec![json!({ "key": "user123/a.pdf", "size": 42 })],
        1,
        true,
        Some("token123".to_string()),
        Some("user123/".to_string()),
    );

    assert_eq!(payload["count"], json!(1));
    assert_eq!(payload["isTruncated"], json!(true));
    assert_eq!(payload["nextContinuationToken"], json!("token123"));
    assert_eq!(payload["objects"][0]["key"], json!("user123/a.pdf"));
}

#[test]
fn test_list_payload_shape_with_empty_bucket() {
    let payload = s3::list_payload(Vec::new(), 0, false, None, None);

    assert_eq!(payload["objects"], json!([]));
    assert_eq!(payload["count"], json!(0));
    assert_eq!(payload["isTruncated"], json!(false));
    assert_eq!(payload["nextContinuationToken"], Value::Null);
}

#[test]
fn test_get_ops_lists_all_operations() {
    let ops = s3::get_ops();
    let operations = ops["operations"].as_array().unwrap();

    assert_eq!(operations.len(), 4);
    assert!(ops["examples"]["put"]["data"]["contentType"].is_string());
}
