//! Watch mode: re-run a stage whenever its source root changes.
//!
//! One consumer thread per source root:
//!
//! | Root | Mode | Stage |
//! |---|---|---|
//! | `styles/` | non-recursive | styles |
//! | `scripts/` | non-recursive | scripts |
//! | `assets/images/original/` | recursive | images |
//!
//! Each consumer handles its events strictly one at a time, so a stage never
//! overlaps with itself. Events that pile up while a run is in progress are
//! drained and coalesced into a single follow-up run. Access events are
//! ignored, otherwise reading the sources would retrigger the stage forever.
//!
//! Shutdown is cooperative: clearing the shared `running` flag, or the event
//! channel disconnecting, ends a consumer quietly. A watcher error is fatal:
//! it clears `running` so the other consumers stop too, and is returned.

use crate::fsutil::{FsError, ensure_dir};
use crate::pipeline::Pipeline;
use crate::tooling::Toolchain;
use crate::types::{Stage, StageReport};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;
use thiserror::Error;

/// How long a consumer blocks before re-checking the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to watch {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("Watch error on {path}: {source}")]
    Event {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("Cannot prepare watch root: {0}")]
    Root(#[from] FsError),
}

/// Event consumer for one watched root.
#[derive(Debug)]
pub struct WatchSubscription {
    pub stage: Stage,
    pub root: PathBuf,
}

impl WatchSubscription {
    pub fn new(stage: Stage, root: PathBuf) -> Self {
        Self { stage, root }
    }

    pub fn mode(&self) -> RecursiveMode {
        if self.stage.is_recursive() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }

    /// Consume `events` until shutdown, calling `run_stage` once per batch of
    /// relevant events. Returns how many times the stage ran.
    pub fn consume<F>(
        &self,
        events: &Receiver<notify::Result<Event>>,
        running: &AtomicBool,
        mut run_stage: F,
    ) -> Result<usize, WatchError>
    where
        F: FnMut(),
    {
        let mut runs = 0;
        while running.load(Ordering::SeqCst) {
            let mut triggered = match events.recv_timeout(POLL_INTERVAL) {
                Ok(event) => self.is_trigger(event)?,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            // Coalesce everything already queued into this run.
            while let Ok(event) = events.try_recv() {
                triggered |= self.is_trigger(event)?;
            }
            if !triggered {
                continue;
            }

            log::info!("{} changed, rebuilding {}", self.root.display(), self.stage);
            run_stage();
            runs += 1;
        }
        Ok(runs)
    }

    fn is_trigger(&self, event: notify::Result<Event>) -> Result<bool, WatchError> {
        let event = event.map_err(|source| WatchError::Event {
            path: self.root.clone(),
            source,
        })?;
        Ok(!matches!(event.kind, EventKind::Access(_)))
    }
}

/// Watch all three source roots until `running` is cleared or a watcher fails.
///
/// `on_report` receives the report of every watch-triggered run. Stage setup
/// failures are logged and the consumer keeps watching.
pub fn watch<T, R>(pipeline: &Pipeline<T>, running: &AtomicBool, on_report: R) -> Result<(), WatchError>
where
    T: Toolchain,
    R: Fn(&StageReport) + Sync,
{
    let on_report = &on_report;
    std::thread::scope(|scope| {
        let handles: Vec<_> = Stage::ALL
            .into_iter()
            .map(|stage| {
                scope.spawn(move || {
                    let result = watch_stage(pipeline, stage, running, on_report);
                    if result.is_err() {
                        running.store(false, Ordering::SeqCst);
                    }
                    result
                })
            })
            .collect();

        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        first_error.map_or(Ok(()), Err)
    })
}

fn watch_stage<T, R>(
    pipeline: &Pipeline<T>,
    stage: Stage,
    running: &AtomicBool,
    on_report: &R,
) -> Result<(), WatchError>
where
    T: Toolchain,
    R: Fn(&StageReport) + Sync,
{
    let subscription = WatchSubscription::new(stage, pipeline.source_root(stage));
    ensure_dir(&subscription.root)?;

    let (tx, rx) = channel();
    let mut watcher =
        RecommendedWatcher::new(tx, notify::Config::default()).map_err(|source| {
            WatchError::Init {
                path: subscription.root.clone(),
                source,
            }
        })?;
    watcher
        .watch(&subscription.root, subscription.mode())
        .map_err(|source| WatchError::Init {
            path: subscription.root.clone(),
            source,
        })?;
    log::info!("Watching {} for changes", subscription.root.display());

    subscription.consume(&rx, running, || match pipeline.run(stage) {
        Ok(report) => on_report(&report),
        Err(e) => log::error!("{e}"),
    })?;
    Ok(())
}
