use thiserror::Error;

/// Errors surfaced by the API client, session handling and flows.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse classification used by flows to pick a recovery path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    Validation,
    AuthRejected,
    NotFound,
    Network,
    Server,
    Internal,
}

impl AppError {
    #[must_use]
    pub fn class(&self) -> FailureClass {
        match self {
            AppError::Validation(_) => FailureClass::Validation,
            AppError::Http { status: 401, .. } => FailureClass::AuthRejected,
            AppError::Http { status: 404, .. } => FailureClass::NotFound,
            AppError::Http { .. } => FailureClass::Server,
            AppError::Network(_) | AppError::Timeout(_) => FailureClass::Network,
            AppError::Config(_)
            | AppError::Parse(_)
            | AppError::Serialization(_)
            | AppError::Cancelled => FailureClass::Internal,
        }
    }

    #[must_use]
    pub fn is_auth_rejected(&self) -> bool {
        self.class() == FailureClass::AuthRejected
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.class() == FailureClass::NotFound
    }

    /// Returns the HTTP status when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message the server attached to an error response.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Http { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
