use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    http_backend::{HttpLoginBackend, HttpLoginBackendConfig},
    unimplemented_backend::UnimplementedBackend,
};
use crate::errors::BackendError;
use crate::models::{LoginParams, LoginResponse};

/// Configuration options for the backend that exchanges login codes.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Default)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "http")]
    Http(HttpLoginBackendConfig),

    #[default]
    #[serde(rename = "unimplemented")]
    Unimplemented,
}

/// A login backend exchanges a one-time platform code (inside `params`)
/// for a user record and, optionally, a token.
#[async_trait::async_trait]
pub trait LoginBackend: Send + Sync {
    fn get_name(&self) -> &str;
    async fn login(&self, params: LoginParams) -> Result<LoginResponse, BackendError>;
}

/// Create a login backend from a given config.
pub fn create_backend(config: &BackendConfig) -> Arc<dyn LoginBackend> {
    match config {
        BackendConfig::Http(cfg) => Arc::new(HttpLoginBackend::new(cfg)),
        BackendConfig::Unimplemented => Arc::new(UnimplementedBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_unimplemented() {
        let backend = create_backend(&BackendConfig::default());
        assert_eq!(backend.get_name(), "unimplemented");
    }

    #[test]
    fn test_http_backend_from_config() {
        let config: BackendConfig = serde_json::from_str(
            r#"{"type": "http", "name": "api", "uri": "http://localhost:9/login"}"#,
        )
        .unwrap();
        let backend = create_backend(&config);
        assert_eq!(backend.get_name(), "api");
    }
}
