//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::reveal::{RunId, Ticker};
use crate::gateway::{GatewayError, GenerateResponse, RequestGateway};

/// Canned-reply gateway. Records every prompt it receives.
pub struct StubGateway {
    reply: Mutex<Option<Result<GenerateResponse, GatewayError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn replying(response: GenerateResponse) -> Self {
        Self {
            reply: Mutex::new(Some(Ok(response))),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Mutex::new(Some(Err(error))),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RequestGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(GenerateResponse::success("")))
    }
}

/// Ticker that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingTicker {
    pub live: Option<RunId>,
    pub started: Vec<RunId>,
    pub cancels: usize,
}

impl Ticker for RecordingTicker {
    fn start(&mut self, run: RunId, _period: Duration) {
        self.cancel();
        self.live = Some(run);
        self.started.push(run);
    }

    fn cancel(&mut self) {
        if self.live.take().is_some() {
            self.cancels += 1;
        }
    }
}

/// Creates a test App with a StubGateway and a 1 ms reveal delay.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(StubGateway::replying(GenerateResponse::success("ok"))),
        Duration::from_millis(1),
    )
}
