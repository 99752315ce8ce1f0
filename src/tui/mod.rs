//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and performs the
//! `Effect`s that `update()` hands back.
//!
//! This is the only module that knows about ratatui, crossterm and tokio
//! tasks. Background work (the gateway round trip, the reveal ticker) talks
//! back to the loop through one `mpsc::Sender<Action>`.
//!
//! ## Redraw Strategy
//!
//! - **Revealing**: polls every `unit_delay` so each tick is drawn promptly.
//! - **Loading**: draws every ~80ms to animate the typing indicator.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ticker;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::reveal::Ticker;
use crate::core::state::App;
use crate::gateway::{HttpGateway, Outcome, RequestGateway};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ticker::TaskTicker;

const LOADING_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol allows Shift+Enter detection; terminals
        // without it ignore the escape sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the HTTP gateway from config and run the UI.
pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let gateway = HttpGateway::new(&config.base_url, &config.endpoint, config.timeout)
        .map_err(std::io::Error::other)?;
    info!("Using gateway {}", gateway.url());
    run_with_gateway(Arc::new(gateway), &config)
}

pub fn run_with_gateway(
    gateway: Arc<dyn RequestGateway>,
    config: &ResolvedConfig,
) -> std::io::Result<()> {
    let mut app = App::from_config(gateway, config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();
    let mut ticker = TaskTicker::new(tx.clone());

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.input_box.locked = app.is_busy();
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = poll_timeout(&app);
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::Quit | TuiEvent::ForceQuit => Some(Action::Quit),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    None
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                    Some(InputEvent::ContentChanged) | None => None,
                },
            };

            if let Some(action) = action {
                let effect = update(&mut app, action);
                if handle_effect(effect, &mut app, &mut ticker, &tx) {
                    break 'main;
                }
                tui.input_box.locked = app.is_busy();
            }
        }

        // Actions from background tasks (gateway replies, reveal ticks)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if !matches!(action, Action::RevealTick(_)) {
                debug!("Event loop received: {:?}", action);
            }
            let effect = update(&mut app, action);
            if handle_effect(effect, &mut app, &mut ticker, &tx) {
                break 'main;
            }
        }
    }

    ticker.cancel();
    ratatui::restore();
    info!("Quill shutting down");
    Ok(())
}

fn poll_timeout(app: &App) -> Duration {
    if app.reveal.is_active() {
        app.unit_delay.min(LOADING_POLL)
    } else if app.is_loading {
        LOADING_POLL
    } else {
        IDLE_POLL
    }
}

/// Perform one `Effect`. Returns true when the loop should exit.
fn handle_effect(
    effect: Effect,
    app: &mut App,
    ticker: &mut dyn Ticker,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::SpawnRequest(prompt) => {
            spawn_request(app.gateway.clone(), prompt, tx.clone());
            false
        }
        Effect::StartTicker(run) => {
            ticker.start(run, app.unit_delay);
            false
        }
        Effect::StopTicker => {
            ticker.cancel();
            false
        }
        Effect::Quit => {
            ticker.cancel();
            true
        }
    }
}

/// One gateway round trip on a tokio task. Always reports back exactly one
/// `GatewaySettled`, whatever the outcome.
fn spawn_request(gateway: Arc<dyn RequestGateway>, prompt: String, tx: mpsc::Sender<Action>) {
    info!("Spawning request via {} (prompt_len={})", gateway.name(), prompt.len());
    tokio::spawn(async move {
        let started = Instant::now();
        let outcome = Outcome::from(gateway.generate(&prompt).await);
        debug!(
            "Request settled in {}ms: {:?}",
            started.elapsed().as_millis(),
            outcome
        );
        if tx.send(Action::GatewaySettled(outcome)).is_err() {
            warn!("Failed to send GatewaySettled: receiver dropped");
        }
    });
}
