//! # Reveal Scheduler
//!
//! Typewriter animation over a fixed list of text targets.
//!
//! A `RevealRun` walks its targets in order. Each tick overwrites the current
//! target's sink with one more character of its full text, then asks the
//! viewport to scroll to the bottom. A target with `n` characters takes
//! `n + 1` ticks (the empty prefix is written first), so a run over `N`
//! targets holding `C` characters finishes in exactly `C + N` ticks.
//!
//! ```text
//! tick:   1    2     3     4    5     6
//! title:  ""   "H"   "Hi"
//! para:                    ""   "O"   "Ok"   → Finished
//! ```
//!
//! The scheduler itself never sleeps. Something outside (a [`Ticker`]) calls
//! back with the run id on a fixed period; ticks for any run other than the
//! active one are dropped.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

/// Something whose visible text can be replaced. Nothing more is assumed.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

impl TextSink for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// The scrollable container the sinks live in.
pub trait Viewport {
    /// Idempotent; nothing is returned.
    fn scroll_to_bottom(&mut self);
}

/// Resolves sink keys to sinks. Implemented by the transcript.
pub trait SinkHost: Viewport {
    type Key: Copy + fmt::Debug;

    fn sink_mut(&mut self, key: Self::Key) -> Option<&mut dyn TextSink>;
}

/// Cancellable repeating task that delivers ticks for one run at a time.
///
/// `start` must cancel any previous task before starting the new one, so at
/// most one handle is ever live.
pub trait Ticker {
    fn start(&mut self, run: RunId, period: Duration);
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// More ticks are needed.
    Continue,
    /// The run just wrote its last character; stop the ticker.
    Finished,
    /// The tick belonged to a run that is no longer active.
    Stale,
}

/// One sink and the text it should end up showing.
#[derive(Debug, Clone)]
pub struct RevealTarget<K> {
    sink: K,
    full_text: String,
    /// Characters written on the last tick (0..=char_len).
    cursor: usize,
    /// Byte offset matching `cursor`.
    byte_end: usize,
    char_len: usize,
    started: bool,
}

impl<K: Copy> RevealTarget<K> {
    pub fn new(sink: K, full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();
        let char_len = full_text.chars().count();
        Self {
            sink,
            full_text,
            cursor: 0,
            byte_end: 0,
            char_len,
            started: false,
        }
    }

    pub fn sink(&self) -> K {
        self.sink
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.started && self.cursor == self.char_len
    }

    /// Text to show on the next tick, advancing the cursor.
    /// Returns the prefix and whether this was the final write.
    fn advance(&mut self) -> (&str, bool) {
        if !self.started {
            self.started = true;
        } else if self.cursor < self.char_len {
            let next = self.full_text[self.byte_end..]
                .chars()
                .next()
                .map_or(0, char::len_utf8);
            self.byte_end += next;
            self.cursor += 1;
        }
        (&self.full_text[..self.byte_end], self.cursor == self.char_len)
    }
}

/// Ordered targets plus the index of the one being revealed.
#[derive(Debug, Clone)]
pub struct RevealRun<K> {
    targets: Vec<RevealTarget<K>>,
    current: usize,
}

impl<K: Copy + fmt::Debug> RevealRun<K> {
    pub fn new(targets: Vec<RevealTarget<K>>) -> Self {
        Self { targets, current: 0 }
    }

    /// Pair each sink with its text, in order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (K, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(sink, text)| RevealTarget::new(sink, text))
                .collect(),
        )
    }

    pub fn targets(&self) -> &[RevealTarget<K>] {
        &self.targets
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current >= self.targets.len()
    }

    /// Total ticks a fresh run needs: characters + one per target.
    pub fn tick_budget(&self) -> usize {
        self.targets.iter().map(|t| t.char_len + 1).sum()
    }

    /// Write one step into the host. A terminal run does nothing.
    pub fn tick<H>(&mut self, host: &mut H) -> TickOutcome
    where
        H: SinkHost<Key = K> + ?Sized,
    {
        let Some(target) = self.targets.get_mut(self.current) else {
            return TickOutcome::Finished;
        };

        let sink_key = target.sink;
        let (visible, done) = target.advance();
        match host.sink_mut(sink_key) {
            Some(sink) => sink.set_text(visible),
            None => warn!("Reveal target {:?} has no sink, skipping write", sink_key),
        }

        if done {
            self.current += 1;
        }
        host.scroll_to_bottom();

        if self.is_terminal() {
            TickOutcome::Finished
        } else {
            TickOutcome::Continue
        }
    }

    /// Drive the run to the end without a timer. Returns ticks consumed.
    pub fn run_to_completion<H>(&mut self, host: &mut H) -> usize
    where
        H: SinkHost<Key = K> + ?Sized,
    {
        let mut ticks = 0;
        while !self.is_terminal() {
            self.tick(host);
            ticks += 1;
        }
        ticks
    }
}

/// Owns the single active run.
#[derive(Debug)]
pub struct RevealScheduler<K> {
    active: Option<(RunId, RevealRun<K>)>,
    next_id: u64,
}

impl<K> Default for RevealScheduler<K> {
    fn default() -> Self {
        Self {
            active: None,
            next_id: 1,
        }
    }
}

impl<K: Copy + fmt::Debug> RevealScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever run is active with `run` and return its id.
    ///
    /// The caller must (re)start its ticker with the returned id; ticks
    /// still queued for the replaced run will come back as `Stale`.
    pub fn start(&mut self, run: RevealRun<K>) -> RunId {
        let id = RunId(self.next_id);
        self.next_id += 1;

        if let Some((old, _)) = self.active.take() {
            warn!("Reveal {} replaced by {} before finishing", old, id);
        }
        info!(
            "Reveal {} started: {} targets, {} ticks",
            id,
            run.targets().len(),
            run.tick_budget()
        );
        self.active = Some((id, run));
        id
    }

    pub fn tick<H>(&mut self, id: RunId, host: &mut H) -> TickOutcome
    where
        H: SinkHost<Key = K> + ?Sized,
    {
        let Some((active_id, run)) = self.active.as_mut() else {
            debug!("Tick for {} with no active reveal", id);
            return TickOutcome::Stale;
        };
        if *active_id != id {
            debug!("Dropping tick for {} (active: {})", id, active_id);
            return TickOutcome::Stale;
        }

        let outcome = run.tick(host);
        if outcome == TickOutcome::Finished {
            info!("Reveal {} finished", id);
            self.active = None;
        }
        outcome
    }

    /// Stop the active run where it is. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<RunId> {
        self.active.as_ref().map(|(id, _)| *id)
    }
}
