//! Error types shared by the session manager and its collaborators.
//!
//! All of them are `Clone`: a single login failure is handed to every caller
//! sharing the in-flight login.

use thiserror::Error;

/// Why the current session does not count as logged in.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no token")]
    NoToken,
    #[error("no user info")]
    NoUser,
}

/// Failures reported by the platform login primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("platform login returned no code")]
    NoCode,
    #[error("platform login failed: {0}")]
    Failed(String),
}

/// Failures reported by a login backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("login backend is not implemented; supply one when building the session manager")]
    NotImplemented,
    #[error("error sending login request: {0}")]
    Request(String),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("error decoding login response: {0}")]
    Decode(String),
    #[error("login rejected: {0}")]
    Rejected(String),
}

/// The error every caller of a failed login receives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("login task aborted: {0}")]
    Aborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages() {
        assert_eq!(ValidationError::NoToken.to_string(), "no token");
        assert_eq!(ValidationError::NoUser.to_string(), "no user info");
    }

    #[test]
    fn login_error_is_transparent_over_sources() {
        let err: LoginError = PlatformError::NoCode.into();
        assert_eq!(err.to_string(), "platform login returned no code");

        let err: LoginError = BackendError::Status(502).into();
        assert_eq!(err.to_string(), "unexpected status code: 502");
    }
}
