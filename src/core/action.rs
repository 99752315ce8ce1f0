//! # Actions
//!
//! Everything that can happen in Quill becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::GatewaySettled(outcome)`.
//! Reveal timer fires? That's `Action::RevealTick(run)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! The round trip for one message:
//!
//! ```text
//! Submit ──▶ user entry, placeholder ──▶ Effect::SpawnRequest
//! GatewaySettled(Reply) ──▶ clear placeholder, empty reply entry ──▶ Effect::StartTicker
//! RevealTick × (C + N) ──▶ ... ──▶ Effect::StopTicker
//! ```

use log::{debug, info, warn};

use crate::core::reveal::{RevealRun, RunId, TickOutcome};
use crate::core::segment::segment;
use crate::core::state::App;
use crate::gateway::Outcome;

pub const STATUS_WAITING: &str = "Waiting for reply...";
pub const STATUS_TYPING: &str = "Typing...";
pub const STATUS_BUSY: &str = "Still answering, please wait";
pub const STATUS_READY: &str = "Ready";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    GatewaySettled(Outcome),
    RevealTick(RunId),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run one gateway round trip for this (trimmed) prompt.
    SpawnRequest(String),
    /// Cancel any running ticker, then tick this run every `unit_delay`.
    StartTicker(RunId),
    StopTicker,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),
        Action::GatewaySettled(outcome) => settle(app, outcome),
        Action::RevealTick(run) => match app.reveal.tick(run, &mut app.transcript) {
            TickOutcome::Continue | TickOutcome::Stale => Effect::None,
            TickOutcome::Finished => {
                app.status_message = STATUS_READY.to_string();
                Effect::StopTicker
            }
        },
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    let prompt = text.trim();
    if prompt.is_empty() {
        return Effect::None;
    }
    if app.is_busy() {
        debug!("Submit ignored: request or reveal still pending");
        app.status_message = STATUS_BUSY.to_string();
        return Effect::None;
    }

    app.transcript.append_user_message(prompt);
    app.transcript.show_placeholder();
    app.is_loading = true;
    app.status_message = STATUS_WAITING.to_string();
    Effect::SpawnRequest(prompt.to_string())
}

fn settle(app: &mut App, outcome: Outcome) -> Effect {
    if !app.is_loading {
        warn!("Gateway settled with no request in flight, ignoring");
        return Effect::None;
    }
    app.is_loading = false;
    app.transcript.clear_placeholder();

    let text = match outcome {
        Outcome::Reply(text) => text,
        other => {
            if let Some(notice) = other.notice() {
                info!("Request failed: {}", notice);
                app.transcript.append_assistant_notice(notice);
            }
            app.status_message = STATUS_READY.to_string();
            return Effect::None;
        }
    };

    let reply = segment(&text);
    let slots = app
        .transcript
        .append_empty_assistant_message(reply.slot_count());
    let run = RevealRun::from_pairs(slots.into_iter().zip(reply.texts()));
    let id = app.reveal.start(run);

    app.status_message = STATUS_TYPING.to_string();
    Effect::StartTicker(id)
}
