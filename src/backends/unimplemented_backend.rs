use super::LoginBackend;
use crate::errors::BackendError;
use crate::models::{LoginParams, LoginResponse};
use async_trait::async_trait;
use tracing::error;

/// The default backend. It always fails, so an application that forgets to
/// supply its own login endpoint finds out on the first login attempt.
pub struct UnimplementedBackend;

impl UnimplementedBackend {
    pub fn new() -> Self {
        UnimplementedBackend
    }
}

impl Default for UnimplementedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginBackend for UnimplementedBackend {
    fn get_name(&self) -> &str {
        "unimplemented"
    }

    async fn login(&self, _params: LoginParams) -> Result<LoginResponse, BackendError> {
        error!("No login backend configured; refusing to exchange login code");
        Err(BackendError::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unimplemented_backend_fails() {
        let backend = UnimplementedBackend::new();
        let res = backend.login(LoginParams::new().with("code", "abc")).await;
        assert_eq!(res, Err(BackendError::NotImplemented));
    }
}
