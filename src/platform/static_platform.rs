use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::base::{LoadingOptions, Platform, PlatformLoginOptions};
use crate::errors::PlatformError;

/// StaticPlatformConfig describes a headless platform with a fixed login code.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct StaticPlatformConfig {
    /// A friendly name for logs.
    pub name: String,
    /// The code handed out by every login.
    pub code: String,
    /// The route reported as the current screen.
    pub route: Option<String>,
}

/// A `StaticPlatform` for running outside a real client shell, e.g. from the
/// command line or in tests. The loading indicator is rendered as log events.
pub struct StaticPlatform {
    pub config: StaticPlatformConfig,
    loading: AtomicBool,
}

impl StaticPlatform {
    pub fn new(config: &StaticPlatformConfig) -> Self {
        info!(
            "Creating static platform '{}' (route={:?})",
            config.name, config.route
        );
        Self {
            config: config.clone(),
            loading: AtomicBool::new(false),
        }
    }

    /// Whether the loading indicator is currently shown.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for StaticPlatform {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn login_code(&self, options: &PlatformLoginOptions) -> Result<String, PlatformError> {
        debug!(
            platform = self.config.name.as_str(),
            timeout_in_ms = options.timeout_in_ms,
            "handing out static login code"
        );
        if self.config.code.is_empty() {
            warn!("Static platform '{}' has no code configured", self.config.name);
            return Err(PlatformError::NoCode);
        }
        Ok(self.config.code.clone())
    }

    fn show_loading(&self, options: &LoadingOptions) {
        self.loading.store(true, Ordering::SeqCst);
        info!(title = options.title.as_str(), mask = options.mask, "loading indicator shown");
    }

    fn hide_loading(&self) {
        self.loading.store(false, Ordering::SeqCst);
        info!("loading indicator hidden");
    }

    fn current_route(&self) -> Option<String> {
        self.config.route.clone()
    }
}
