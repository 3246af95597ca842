use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::LoginBackend;
use crate::errors::BackendError;
use crate::models::{LoginParams, LoginResponse};

/// The config needed to reach an HTTP login endpoint.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct HttpLoginBackendConfig {
    pub name: String,
    /// Full URL of the endpoint; the login params are POSTed to it as JSON.
    pub uri: String,
    pub timeout_in_ms: Option<u64>,
}

/// A backend that posts the login params to an HTTP endpoint and reads the
/// user (and optional token) back from the JSON response.
pub struct HttpLoginBackend {
    pub config: HttpLoginBackendConfig,
    client: reqwest::Client,
}

impl HttpLoginBackend {
    pub fn new(config: &HttpLoginBackendConfig) -> Self {
        info!(
            "Creating HTTP login backend '{}' for {}",
            config.name, config.uri
        );
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });
        Self {
            config: config.clone(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl LoginBackend for HttpLoginBackend {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn login(&self, params: LoginParams) -> Result<LoginResponse, BackendError> {
        debug!("Sending login request to: {}", self.config.uri);
        let response = self
            .client
            .post(&self.config.uri)
            .json(&params)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|e| BackendError::Decode(e.to_string()))?;
            LoginResponse::from_value(body)
                .ok_or_else(|| BackendError::Decode("expected a JSON object".to_string()))
        } else if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let reason = response.text().await.unwrap_or_default();
            warn!(
                "Login endpoint '{}' rejected the code: {}",
                self.config.name, reason
            );
            Err(BackendError::Rejected(reason))
        } else {
            Err(BackendError::Status(status.as_u16()))
        }
    }
}
