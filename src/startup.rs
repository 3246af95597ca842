//! Building a session manager from configuration and running a one-shot login.

use tracing::{error, info};

use crate::backends::create_backend;
use crate::config::ConfigV1;
use crate::errors::LoginError;
use crate::platform::create_platform;
use crate::session::{LoginOutcome, SessionManager};

/// Wire the configured platform and backend into a new session manager.
pub fn build_session_manager(config: &ConfigV1) -> SessionManager {
    let platform = create_platform(&config.platform);
    let backend = create_backend(&config.backend);
    SessionManager::new(platform, backend, config.session.clone())
}

/// Log in once and return the session's user as pretty JSON.
///
/// # Errors
///
/// Returns the login error if the platform or backend step fails.
pub async fn run(config: &ConfigV1) -> Result<String, LoginError> {
    let manager = build_session_manager(config);

    manager.on_login(|| info!("session is ready"), Some("startup"));

    match manager.login().await {
        Ok(outcome) => {
            let user = manager.user().unwrap_or_default();
            info!(
                fresh = matches!(outcome, LoginOutcome::LoggedIn(_)),
                has_token = manager.token().is_some(),
                "logged in"
            );
            Ok(serde_json::to_string_pretty(&user).unwrap_or_else(|_| "{}".to_string()))
        }
        Err(e) => {
            error!("Login failed: {}", e);
            Err(e)
        }
    }
}
