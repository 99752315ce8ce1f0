//! HTTP gateway: POSTs `{"prompt": ...}` as JSON and reads back the
//! `{ok, text | error}` body.
//!
//! The backend answers failures with a 4xx/5xx status *and* a JSON body, so
//! the status alone is not treated as a transport failure. Only an
//! unreachable server or an unreadable body is.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::gateway::{GatewayError, GenerateRequest, GenerateResponse, RequestGateway};

pub struct HttpGateway {
    url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let url = join_url(base_url, endpoint);
        reqwest::Url::parse(&url).map_err(|e| GatewayError::Config(format!("{url}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Join without doubling or dropping the slash between the two halves.
fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[async_trait]
impl RequestGateway for HttpGateway {
    fn name(&self) -> &str {
        &self.url
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GatewayError> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
        };

        info!("POST {} (prompt_len={})", self.url, prompt.len());

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Gateway response status: {}", status);

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(parsed) => {
                if !status.is_success() {
                    warn!("Gateway returned HTTP {} with ok={}", status.as_u16(), parsed.ok);
                }
                Ok(parsed)
            }
            Err(e) => {
                warn!("Unreadable gateway body (HTTP {}): {}", status.as_u16(), e);
                Err(GatewayError::Parse(e.to_string()))
            }
        }
    }
}
