use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::static_platform::{StaticPlatform, StaticPlatformConfig};
use crate::errors::PlatformError;

/// Configuration options for the platform the session runs on.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum PlatformConfig {
    #[serde(rename = "static")]
    Static(StaticPlatformConfig),
}

/// Options passed to the platform login primitive.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct PlatformLoginOptions {
    /// Upper bound the platform may apply to its own code retrieval.
    pub timeout_in_ms: Option<u64>,
}

/// How the loading indicator is shown while a login is running.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct LoadingOptions {
    #[serde(default = "default_loading_title")]
    pub title: String,
    /// Block interaction with the screen underneath the indicator.
    #[serde(default = "default_loading_mask")]
    pub mask: bool,
}

fn default_loading_title() -> String {
    "Logging in...".to_string()
}

fn default_loading_mask() -> bool {
    true
}

impl Default for LoadingOptions {
    fn default() -> Self {
        LoadingOptions {
            title: default_loading_title(),
            mask: default_loading_mask(),
        }
    }
}

/// The host platform: hands out one-time login codes, draws the loading
/// indicator and knows which screen is currently displayed.
#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    fn get_name(&self) -> &str;

    /// Obtain a one-time login code. An empty code is reported as `PlatformError::NoCode`.
    async fn login_code(&self, options: &PlatformLoginOptions) -> Result<String, PlatformError>;

    /// Loading indicator calls are best-effort.
    fn show_loading(&self, _options: &LoadingOptions) {}
    fn hide_loading(&self) {}

    /// Identifier of the screen currently displayed, if any.
    fn current_route(&self) -> Option<String>;
}

/// Create a platform from a given config.
pub fn create_platform(config: &PlatformConfig) -> Arc<dyn Platform> {
    match config {
        PlatformConfig::Static(cfg) => Arc::new(StaticPlatform::new(cfg)),
    }
}
