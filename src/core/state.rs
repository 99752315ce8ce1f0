//! # Application State
//!
//! Core business state for Quill. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── gateway: Arc<dyn RequestGateway>   // prompt → reply round trip
//! ├── transcript: Transcript             // entries + placeholder
//! ├── reveal: RevealScheduler<SlotRef>   // the single active typewriter run
//! ├── status_message: String             // status bar text
//! ├── is_loading: bool                   // request in flight
//! └── unit_delay: Duration               // per-character reveal delay
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::reveal::RevealScheduler;
use crate::core::transcript::{SlotRef, Transcript};
use crate::gateway::RequestGateway;

pub const WELCOME_STATUS: &str = "Type a message and press Enter";

pub struct App {
    pub gateway: Arc<dyn RequestGateway>,
    pub transcript: Transcript,
    pub reveal: RevealScheduler<SlotRef>,
    pub status_message: String,
    pub is_loading: bool,
    pub unit_delay: Duration,
}

impl App {
    pub fn new(gateway: Arc<dyn RequestGateway>, unit_delay: Duration) -> Self {
        Self {
            gateway,
            transcript: Transcript::new(),
            reveal: RevealScheduler::new(),
            status_message: String::from(WELCOME_STATUS),
            is_loading: false,
            unit_delay,
        }
    }

    pub fn from_config(gateway: Arc<dyn RequestGateway>, config: &ResolvedConfig) -> Self {
        Self::new(gateway, config.unit_delay)
    }

    /// A request is in flight or a reply is still being typed out.
    /// Sending is disabled while this holds.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.reveal.is_active()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::state::WELCOME_STATUS;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, WELCOME_STATUS);
        assert!(!app.is_loading);
        assert!(!app.is_busy());
        assert!(app.transcript.is_empty());
        assert_eq!(app.gateway.name(), "stub");
    }
}
