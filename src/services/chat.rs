//! Chat service.
//!
//! Conversational specialization of the operation-router pattern. Messages
//! are persisted to a fixed DynamoDB table; the reply in the `send` path is
//! a synthesized echo, there is no model call here.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use serde::Deserialize;
use serde_dynamo::aws_sdk_dynamodb_1::{from_items, to_item};
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aws::client_factory;
use crate::core::models::{
    ApiRequest, ApiResponse, AwsCredentials, ChatAgent, ChatMessage, MessageRole, UserSession,
};
use crate::errors::ServiceError;

const MESSAGES_TABLE: &str = "captify-chat-messages";

const VALID_OPERATIONS: &[&str] = &[
    "send",
    "getHistory",
    "deleteSession",
    "storeMessage",
    "createSession",
    "getSessions",
    "getMessages",
    "getAgents",
];

/// Operation discovery descriptor for this service.
#[must_use]
pub fn get_ops() -> Value {
    json!({
        "operations": VALID_OPERATIONS,
        "description": "Chat service for AI conversation and message management",
        "examples": {
            "send": {
                "operation": "send",
                "data": {
                    "message": "Hello, how can you help me?",
                    "userId": "user123",
                    "sessionId": "session456",
                    "agentId": "default"
                }
            },
            "getHistory": {
                "operation": "getHistory",
                "data": { "userId": "user123", "sessionId": "session456", "limit": 10 }
            },
            "getAgents": {
                "operation": "getAgents",
                "data": {}
            }
        }
    })
}

/// Execute a chat operation. All chat requests route through here.
pub async fn execute(
    request: &ApiRequest,
    session: &UserSession,
    credentials: &AwsCredentials,
) -> ApiResponse {
    let operation = request.operation.as_deref().unwrap_or("send");

    if !VALID_OPERATIONS.contains(&operation) {
        return ApiResponse::err(
            "chat.execute",
            format!(
                "Invalid chat operation: {operation}. Valid operations: {}",
                VALID_OPERATIONS.join(", ")
            ),
        );
    }

    info!(user_id = %session.user_id, operation, "chat request");

    match operation {
        "send" => {
            let client = client_factory::dynamodb_client(credentials);
            wrap("chat.send", execute_send(&client, &request.data).await)
        }
        "getHistory" => {
            let client = client_factory::dynamodb_client(credentials);
            wrap(
                "chat.getHistory",
                execute_get_history(&client, &request.data).await,
            )
        }
        "getAgents" => ApiResponse::ok("chat.getAgents", agents_payload()),
        // Interface surface reserved ahead of implementation. These fail
        // explicitly so callers can tell "did nothing" from "did the thing".
        other => {
            let source = format!("chat.{other}");
            wrap(
                &source,
                Err(ServiceError::NotImplemented(format!(
                    "Chat operation '{other}' is not implemented"
                ))),
            )
        }
    }
}

fn wrap(source: &str, result: Result<Value, ServiceError>) -> ApiResponse {
    match result {
        Ok(data) => ApiResponse::ok(source, data),
        Err(e) => {
            warn!(source, error = %e, "chat operation failed");
            ApiResponse::err(source, e.to_string())
        }
    }
}

/// Parse `data` into a typed request; an absent payload parses as empty.
fn parse<T: serde::de::DeserializeOwned>(data: &Value) -> Result<T, ServiceError> {
    let data = if data.is_null() {
        Value::Object(Map::new())
    } else {
        data.clone()
    };
    serde_json::from_value(data).map_err(|e| ServiceError::Validation(e.to_string()))
}

// ============================================================================
// send
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub message: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub agent_id: Option<String>,
    pub metadata: Option<Value>,
}

/// The pair of records a `send` call persists.
#[derive(Debug)]
pub struct SendRecords {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

#[must_use]
pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

fn new_message_id() -> String {
    format!("msg-{}", Uuid::new_v4())
}

/// Build the user record and the echoed assistant record for a send request.
///
/// # Errors
///
/// Returns a validation error when `message` or `userId` is missing or empty.
pub fn build_send_records(req: &SendRequest) -> Result<SendRecords, ServiceError> {
    let message = req.message.as_deref().filter(|m| !m.is_empty());
    let user_id = req.user_id.as_deref().filter(|u| !u.is_empty());

    let (Some(message), Some(user_id)) = (message, user_id) else {
        return Err(ServiceError::Validation(
            "Message and userId are required".to_string(),
        ));
    };

    // Metadata is merged into the assistant record, so it must be a map.
    if req.metadata.as_ref().is_some_and(|m| !m.is_object()) {
        return Err(ServiceError::Validation(
            "metadata must be an object".to_string(),
        ));
    }

    let session_id = req
        .session_id
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(new_session_id);

    let user_message = ChatMessage {
        id: new_message_id(),
        content: message.to_string(),
        role: MessageRole::User,
        timestamp: Utc::now().to_rfc3339(),
        session_id: session_id.clone(),
        user_id: user_id.to_string(),
        agent_id: req.agent_id.clone(),
        metadata: req.metadata.clone(),
    };

    let assistant_message = ChatMessage {
        id: new_message_id(),
        content: format!("Echo: {message}"),
        role: MessageRole::Assistant,
        timestamp: Utc::now().to_rfc3339(),
        session_id,
        user_id: user_id.to_string(),
        agent_id: Some(req.agent_id.clone().unwrap_or_else(|| "default".to_string())),
        metadata: Some(mark_generated(req.metadata.as_ref())),
    };

    Ok(SendRecords {
        user_message,
        assistant_message,
    })
}

fn mark_generated(metadata: Option<&Value>) -> Value {
    let mut map = metadata
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    map.insert("generated".to_string(), Value::Bool(true));
    Value::Object(map)
}

async fn execute_send(client: &DynamoDbClient, data: &Value) -> Result<Value, ServiceError> {
    let req: SendRequest = parse(data)?;
    let records = build_send_records(&req)?;

    put_message(client, &records.user_message).await?;
    put_message(client, &records.assistant_message).await?;

    Ok(json!({
        "response": records.assistant_message.content,
        "sessionId": records.assistant_message.session_id,
        "messageId": records.assistant_message.id,
    }))
}

async fn put_message(client: &DynamoDbClient, message: &ChatMessage) -> Result<(), ServiceError> {
    let item: HashMap<String, AttributeValue> = to_item(message)?;
    client
        .put_item()
        .table_name(MESSAGES_TABLE)
        .set_item(Some(item))
        .send()
        .await?;
    Ok(())
}

// ============================================================================
// getHistory
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub limit: Option<i32>,
}

/// How a history request will be served: a session-scoped key-condition
/// query, or a bounded user-filtered scan when no session is given.
#[derive(Debug, PartialEq, Eq)]
pub enum HistoryPlan {
    SessionQuery {
        session_id: String,
        user_id: String,
        limit: i32,
    },
    UserScan {
        user_id: String,
        limit: i32,
    },
}

/// # Errors
///
/// Returns a validation error when `userId` is missing.
pub fn build_history_plan(req: &HistoryRequest) -> Result<HistoryPlan, ServiceError> {
    let user_id = req
        .user_id
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ServiceError::Validation("userId is required".to_string()))?;
    let limit = req.limit.unwrap_or(50);

    match req.session_id.as_deref().filter(|s| !s.is_empty()) {
        Some(session_id) => Ok(HistoryPlan::SessionQuery {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            limit,
        }),
        None => Ok(HistoryPlan::UserScan {
            user_id: user_id.to_string(),
            limit,
        }),
    }
}

async fn execute_get_history(client: &DynamoDbClient, data: &Value) -> Result<Value, ServiceError> {
    let req: HistoryRequest = parse(data)?;

    let (items, count) = match build_history_plan(&req)? {
        HistoryPlan::SessionQuery {
            session_id,
            user_id,
            limit,
        } => {
            let mut values = Map::new();
            values.insert(":sessionId".to_string(), Value::String(session_id));
            values.insert(":userId".to_string(), Value::String(user_id));

            let output = client
                .query()
                .table_name(MESSAGES_TABLE)
                .key_condition_expression("sessionId = :sessionId AND userId = :userId")
                .set_expression_attribute_values(Some(to_item(&values)?))
                .scan_index_forward(false) // most recent first
                .limit(limit)
                .send()
                .await?;

            let items: Vec<Value> = from_items(output.items.unwrap_or_default())?;
            (items, output.count)
        }
        HistoryPlan::UserScan { user_id, limit } => {
            let mut values = Map::new();
            values.insert(":userId".to_string(), Value::String(user_id));

            let output = client
                .scan()
                .table_name(MESSAGES_TABLE)
                .filter_expression("userId = :userId")
                .set_expression_attribute_values(Some(to_item(&values)?))
                .limit(limit)
                .send()
                .await?;

            let items: Vec<Value> = from_items(output.items.unwrap_or_default())?;
            (items, output.count)
        }
    };

    Ok(json!({ "messages": items, "count": count }))
}

// ============================================================================
// getAgents
// ============================================================================

/// The single built-in agent descriptor.
#[must_use]
pub fn default_agents() -> Vec<ChatAgent> {
    vec![ChatAgent {
        id: "default".to_string(),
        name: "Default Assistant".to_string(),
        description: "General purpose AI assistant".to_string(),
        icon: None,
        default: Some(true),
        bedrock_agent_id: None,
        bedrock_agent_alias_id: None,
    }]
}

fn agents_payload() -> Value {
    json!({ "agents": default_agents() })
}
