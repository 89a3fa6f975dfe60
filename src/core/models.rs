//! Wire shapes shared by every service domain.
//!
//! All services consume an [`ApiRequest`] and produce an [`ApiResponse`]
//! envelope, so callers never branch on store-specific result shapes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Generic service request. `operation` defaults per domain when absent
/// (`scan` for the key-value domain, `send` for chat).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRequest {
    pub service: Option<String>,
    pub operation: Option<String>,
    pub table: Option<String>,
    pub resource: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ApiRequest {
    /// Table name for key-value operations: `table` wins over `resource`.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref().or(self.resource.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub request_id: String,
    pub timestamp: String,
    pub source: String,
}

impl ResponseMetadata {
    fn new(source: &str) -> Self {
        Self {
            request_id: format!("{source}-{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339(),
            source: source.to_string(),
        }
    }
}

/// Uniform response envelope. Exactly one of `data`/`error` is meaningful
/// depending on `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: ResponseMetadata,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(source: &str, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResponseMetadata::new(source),
        }
    }

    #[must_use]
    pub fn err(source: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            metadata: ResponseMetadata::new(source),
        }
    }
}

/// Short-lived credentials supplied by the external session provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

/// Caller identity forwarded with every request. Session plumbing itself is
/// owned by the identity provider, not this layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub email: Option<String>,
    pub id_token: Option<String>,
    pub aws_session_token: Option<String>,
}

// ============================================================================
// Chat records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub role: MessageRole,
    pub timestamp: String,
    pub session_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAgent {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrock_agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrock_agent_alias_id: Option<String>,
}
