use crate::errors::ValidationError;
use crate::models::user::User;

/// The in-memory session: the authenticated user and their access token.
///
/// Having only one of the two is a reachable state; it simply does not count
/// as logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the token first, then the user. Empty tokens count as missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.token.as_deref() {
            None | Some("") => return Err(ValidationError::NoToken),
            Some(_) => {}
        }
        if self.user.is_none() {
            return Err(ValidationError::NoUser);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Store a login result. Without an explicit token the user's embedded one is used.
    pub fn commit(&mut self, user: User, token: Option<String>) {
        self.token = token
            .filter(|t| !t.is_empty())
            .or_else(|| user.token().map(str::to_string));
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}
