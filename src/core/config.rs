use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub aws_region: String,
    pub neptune_endpoint: Option<String>,
    pub neptune_text_search_enabled: bool,
    // Reserved for the IAM auth path once it is enabled on the cluster.
    pub cognito_identity_pool_id: Option<String>,
    pub cognito_user_pool_id: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            neptune_endpoint: env::var("NEPTUNE_ENDPOINT").ok(),
            neptune_text_search_enabled: env::var("NEPTUNE_TEXT_SEARCH_ENABLED")
                .map(|v| v == "true")
                .unwrap_or(false),
            cognito_identity_pool_id: env::var("COGNITO_SERVICE_CATALOG_POOL_ID").ok(),
            cognito_user_pool_id: env::var("COGNITO_USER_POOL_ID").ok(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `NEPTUNE_ENDPOINT` is not configured.
    pub fn require_neptune_endpoint(&self) -> Result<&str, String> {
        self.neptune_endpoint
            .as_deref()
            .ok_or_else(|| "NEPTUNE_ENDPOINT environment variable is required".to_string())
    }
}
