use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The User struct holds whatever the login backend returned for the user.
///
/// The record is opaque to the session layer apart from an optional embedded
/// `token` field, which is used when the backend does not return a separate token.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct User {
    pub fields: Map<String, Value>,
}

impl User {
    pub fn new(fields: Map<String, Value>) -> Self {
        User { fields }
    }

    /// Build a user from a JSON value. Anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(User { fields }),
            _ => None,
        }
    }

    /// The token embedded in the user record, if any.
    pub fn token(&self) -> Option<&str> {
        self.fields.get("token").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Parameters sent to the login backend. Always contains the one-time `code`
/// once the orchestrator hands it over.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct LoginParams {
    pub fields: Map<String, Value>,
}

impl LoginParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn set_code(&mut self, code: &str) {
        self.fields
            .insert("code".to_string(), Value::from(code.to_string()));
    }

    pub fn code(&self) -> Option<&str> {
        self.fields.get("code").and_then(Value::as_str)
    }
}

/// What a backend hands back after exchanging the code.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub user: User,
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn new(user: User, token: Option<String>) -> Self {
        LoginResponse { user, token }
    }

    /// Accepts `{"user": {...}, "token": "..."}` or a flat user object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        if let Some(Value::Object(user)) = map.get("user") {
            let token = map.get("token").and_then(Value::as_str).map(str::to_string);
            return Some(LoginResponse {
                user: User::new(user.clone()),
                token,
            });
        }

        Some(LoginResponse {
            user: User::new(map),
            token: None,
        })
    }
}
