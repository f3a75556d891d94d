// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress ticker shown while a conversion runs.
//
// The ticker does not observe the engines. It adds a fixed step on a fixed
// interval up to a cap below 100; only `ProgressTicker::complete` may report
// 100, and `ProgressTicker::fail` resets to 0.
//
// Each `start` bumps a generation counter. A ticker only writes while its
// generation is current, and the check happens under the watch channel's
// lock, so a stale task or a late `complete` from an abandoned conversion can
// never overwrite the state of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pdfify_core::config::ProgressConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Value reported once the dispatcher has settled successfully.
pub const COMPLETE: u8 = 100;

struct Shared {
    tx: watch::Sender<u8>,
    generation: AtomicU64,
}

/// Owns the caller-visible progress value for one call site.
///
/// Run concurrent conversions with one reporter each.
#[derive(Clone)]
pub struct ProgressReporter {
    shared: Arc<Shared>,
    config: ProgressConfig,
}

impl ProgressReporter {
    pub fn new(config: ProgressConfig) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                tx,
                generation: AtomicU64::new(0),
            }),
            config,
        }
    }

    /// Watch the progress value.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.shared.tx.subscribe()
    }

    pub fn current(&self) -> u8 {
        *self.shared.tx.borrow()
    }

    /// Reset to 0 and start ticking for a new conversion.
    ///
    /// Any ticker from an earlier conversion is invalidated. Must be called
    /// from within a Tokio runtime.
    pub fn start(&self) -> ProgressTicker {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.tx.send_replace(0);
        debug!(generation, "progress started");

        let shared = Arc::clone(&self.shared);
        let step = self.config.step;
        let cap = self.config.effective_cap();
        let interval = self.config.interval();

        let handle = tokio::spawn(async move {
            if step == 0 {
                return;
            }
            let mut ticks = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticks.tick().await;

            loop {
                ticks.tick().await;
                let mut finished = false;
                shared.tx.send_if_modified(|value| {
                    if shared.generation.load(Ordering::SeqCst) != generation {
                        finished = true;
                        return false;
                    }
                    let next = value.saturating_add(step).min(cap);
                    finished = next >= cap;
                    if next == *value {
                        return false;
                    }
                    *value = next;
                    true
                });
                trace!(generation, finished, "progress tick");
                if finished {
                    break;
                }
            }
        });

        ProgressTicker {
            shared: Arc::clone(&self.shared),
            generation,
            handle,
        }
    }
}

/// The ticking task of one conversion.
///
/// Dropping the ticker cancels it and leaves the value where it was;
/// `complete` and `fail` cancel it and write the terminal value.
pub struct ProgressTicker {
    shared: Arc<Shared>,
    generation: u64,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// The conversion succeeded: report 100.
    pub fn complete(self) {
        self.settle(Some(COMPLETE));
    }

    /// The conversion failed: reset to 0.
    pub fn fail(self) {
        self.settle(Some(0));
    }

    fn settle(&self, value: Option<u8>) {
        self.handle.abort();
        let retired = self
            .shared
            .generation
            .compare_exchange(
                self.generation,
                self.generation + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();

        match (retired, value) {
            (true, Some(value)) => {
                self.shared.tx.send_replace(value);
                debug!(generation = self.generation, value, "progress settled");
            }
            (true, None) => debug!(generation = self.generation, "progress abandoned"),
            (false, _) => debug!(generation = self.generation, "stale progress ignored"),
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        // After complete/fail this is a no-op: the generation has moved on.
        self.settle(None);
    }
}
