use std::fmt;

use async_trait::async_trait;

use super::types::{Circle, Member, PresenceUpdate, Profile};

/// Errors that can occur during backend operations.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured (missing API key, bad URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Service returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse the service's response. Not retryable.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The circle service a running app talks to. Built once at startup and
/// injected wherever data is needed; nothing else holds a connection.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Fetches the signed-in profile.
    async fn load_profile(&self) -> Result<Profile, BackendError>;

    /// Lists the circles the profile belongs to.
    async fn list_circles(&self) -> Result<Vec<Circle>, BackendError>;

    /// Fetches the member roster of one circle.
    async fn circle_members(&self, circle_id: &str) -> Result<Vec<Member>, BackendError>;

    /// Publishes this device's presence to every circle it belongs to.
    async fn publish_presence(&self, update: &PresenceUpdate) -> Result<(), BackendError>;
}
