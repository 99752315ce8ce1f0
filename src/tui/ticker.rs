//! Tokio-backed [`Ticker`]: one interval task that sends
//! `Action::RevealTick(run)` into the event loop's channel.

use std::sync::mpsc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

use crate::core::action::Action;
use crate::core::reveal::{RunId, Ticker};

pub struct TaskTicker {
    tx: mpsc::Sender<Action>,
    handle: Option<AbortHandle>,
}

impl TaskTicker {
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self { tx, handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Ticker for TaskTicker {
    fn start(&mut self, run: RunId, period: Duration) {
        self.cancel();

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // First tick is immediate; the first character waits one period
            loop {
                interval.tick().await;
                if tx.send(Action::RevealTick(run)).is_err() {
                    warn!("Reveal tick for {} dropped: receiver closed", run);
                    return;
                }
            }
        });
        debug!("Ticker started for {} every {:?}", run, period);
        self.handle = Some(task.abort_handle());
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reveal::RevealScheduler;
    use crate::core::reveal::RevealRun;

    fn drain(rx: &mpsc::Receiver<Action>) -> Vec<Action> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    fn two_runs() -> (RunId, RunId) {
        let mut scheduler: RevealScheduler<usize> = RevealScheduler::new();
        let a = scheduler.start(RevealRun::new(Vec::new()));
        let b = scheduler.start(RevealRun::new(Vec::new()));
        (a, b)
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_task() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = TaskTicker::new(tx);
        let (first, second) = two_runs();

        ticker.start(first, Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(drain(&rx).iter().all(|a| *a == Action::RevealTick(first)));

        ticker.start(second, Duration::from_millis(1));
        drain(&rx);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let ticks = drain(&rx);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|a| *a == Action::RevealTick(second)));
    }

    #[tokio::test]
    async fn test_cancel_stops_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = TaskTicker::new(tx);
        let (run, _) = two_runs();

        ticker.start(run, Duration::from_millis(1));
        assert!(ticker.is_running());
        tokio::time::sleep(Duration::from_millis(10)).await;
        ticker.cancel();
        assert!(!ticker.is_running());
        drain(&rx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(drain(&rx).is_empty());
    }
}
