//! Scoped debounce timer on the tokio runtime.
//!
//! Each [`schedule`](DebounceTimer::schedule) aborts the previous sleep task
//! before spawning a new one, and dropping the timer aborts whatever is still
//! pending. A fire that races with a cancel is discarded by generation.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct DebounceTimer {
    delay: Duration,
    task: Option<JoinHandle<()>>,
    generation: u64,
    tx: mpsc::Sender<u64>,
    rx: mpsc::Receiver<u64>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel(4);
        Self {
            delay,
            task: None,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending fire and start the quiet period over.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        let delay = self.delay;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(generation).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Resolves when the current schedule elapses. Pending forever while
    /// nothing is scheduled. Cancel safe.
    pub async fn fired(&mut self) {
        loop {
            let Some(generation) = self.rx.recv().await else {
                return std::future::pending().await;
            };
            if generation == self.generation && self.task.is_some() {
                self.task = None;
                return;
            }
        }
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
