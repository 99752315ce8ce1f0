use std::fmt;

use async_trait::async_trait;

use super::types::GenerateResponse;

/// Failures below the application level. The backend never produced a
/// readable `{ok, ...}` body.
#[derive(Debug)]
pub enum GatewayError {
    /// Gateway misconfigured (bad URL, client could not be built).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config(msg) => write!(f, "config error: {msg}"),
            GatewayError::Network(msg) => write!(f, "{msg}"),
            GatewayError::Parse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Performs one prompt → reply round trip. Never retries.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Short human-readable name (shown in the title bar).
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GatewayError>;
}
