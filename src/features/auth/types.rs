//! Request and response types for the auth endpoints plus the client-side
//! session. Requests carry passwords and responses carry bearer tokens, so
//! secrets are held as `SecretString` and none of these may be logged verbatim.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Profile of the signed-in user. Fields other than `username` and `email`
/// (`id`, `roles`, ...) are carried through untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authenticated identity plus the tokens held for it.
#[derive(Clone, Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(serialize_with = "expose")]
    pub confirm_password: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(serialize_with = "expose")]
    pub refresh_token: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Raw body of `/auth/login` and `/auth/refresh`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Kept raw: some backends send seconds as a float or a string.
    #[serde(default)]
    pub expires_in: Option<Value>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Tokens (and, for login, the profile) issued by the server.
#[derive(Debug)]
pub struct LoginSuccess {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub expires_in: Option<u64>,
    pub user: Option<UserProfile>,
}

impl LoginSuccess {
    /// A session needs a profile; refresh responses carry tokens only.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        Some(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: self.user?,
        })
    }
}

#[derive(Debug)]
pub enum LoginResult {
    Authenticated(LoginSuccess),
    Rejected(String),
    Incomplete,
}

/// Reads a token lifetime as whole seconds. Anything unusable is dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lifetime_secs(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    if let Some(whole) = value.as_u64() {
        return Some(whole);
    }
    Some(secs as u64)
}

impl LoginResponse {
    #[must_use]
    pub fn into_result(self) -> LoginResult {
        match self.access_token.filter(|token| !token.is_empty()) {
            Some(token) => LoginResult::Authenticated(LoginSuccess {
                access_token: SecretString::from(token),
                refresh_token: self
                    .refresh_token
                    .filter(|token| !token.is_empty())
                    .map(SecretString::from),
                expires_in: self.expires_in.as_ref().and_then(lifetime_secs),
                user: self
                    .user
                    .and_then(|user| serde_json::from_value(user).ok()),
            }),
            None => match self.error.filter(|error| !error.is_empty()) {
                Some(error) => LoginResult::Rejected(error),
                None => LoginResult::Incomplete,
            },
        }
    }
}

#[derive(Debug)]
pub enum RegisterResult {
    Created(Map<String, Value>),
    Rejected(String),
    Incomplete,
}

impl RegisterResult {
    /// Interprets a register body: an `id`, a `username` or a "successful"
    /// message counts as created.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let Value::Object(body) = body else {
            return RegisterResult::Incomplete;
        };

        let has_text = |key: &str| {
            body.get(key).is_some_and(|value| match value {
                Value::String(text) => !text.is_empty(),
                Value::Null | Value::Bool(false) => false,
                Value::Number(number) => number.as_f64() != Some(0.0),
                _ => true,
            })
        };
        let announced = body
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|message| message.contains("successful"));

        if has_text("id") || has_text("username") || announced {
            return RegisterResult::Created(body);
        }

        match body.get("error").and_then(Value::as_str) {
            Some(error) if !error.is_empty() => RegisterResult::Rejected(error.to_string()),
            _ => RegisterResult::Incomplete,
        }
    }
}
