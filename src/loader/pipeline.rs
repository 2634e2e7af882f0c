use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{AbortHandle, Abortable};
use futures::FutureExt;
use rustc_hash::FxHashMap;

use crate::errors::LoadError;
use crate::loader::{LoadSource, load};
use crate::schema::AnimationLog;

#[cfg(not(target_arch = "wasm32"))]
type TaskFuture = futures::future::BoxFuture<'static, ()>;
#[cfg(target_arch = "wasm32")]
type TaskFuture = futures::future::LocalBoxFuture<'static, ()>;

/// Logical load slot. A new request for a slot supersedes the one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadSlot(pub u32);

impl LoadSlot {
    /// The slot used by startup loads and drag-and-drop.
    pub const PRIMARY: Self = Self(0);
}

/// Result of one finished load attempt.
#[derive(Debug)]
pub struct LoadCompletion {
    pub slot: LoadSlot,
    pub generation: u64,
    pub label: String,
    pub result: Result<AnimationLog, LoadError>,
}

struct InFlight {
    generation: u64,
    abort: AbortHandle,
}

/// Issues load tasks and collects their results.
///
/// Tasks run wherever the host spawns them; each one sends its
/// [`LoadCompletion`] back over a channel. [`drain`](Self::drain) yields only
/// completions that are still current for their slot, so a stale response
/// can never overtake a newer request.
pub struct LoaderPipeline {
    sender: flume::Sender<LoadCompletion>,
    receiver: flume::Receiver<LoadCompletion>,
    in_flight: FxHashMap<LoadSlot, InFlight>,
    next_generation: u64,
}

impl Default for LoaderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderPipeline {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            in_flight: FxHashMap::default(),
            next_generation: 0,
        }
    }

    /// Starts a load for `slot`, aborting any load already in flight there.
    ///
    /// The returned task does nothing until polled; hand it to an executor.
    pub fn request(&mut self, slot: LoadSlot, source: LoadSource) -> LoadTask {
        let generation = self.next_generation;
        self.next_generation += 1;

        let (abort, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.in_flight.insert(slot, InFlight { generation, abort }) {
            log::warn!(
                "Load {} on slot {} superseded by load {generation}",
                previous.generation,
                slot.0
            );
            previous.abort.abort();
        }

        let label = source.label();
        log::info!("Loading '{label}' (slot {}, load {generation})", slot.0);

        let sender = self.sender.clone();
        let work = async move {
            let result = load(source).await;
            // The receiver lives as long as the pipeline; a send error only
            // means the viewer is gone.
            let _ = sender.send(LoadCompletion {
                slot,
                generation,
                label,
                result,
            });
        };

        #[cfg(not(target_arch = "wasm32"))]
        let work: TaskFuture = work.boxed();
        #[cfg(target_arch = "wasm32")]
        let work: TaskFuture = work.boxed_local();

        LoadTask {
            inner: Abortable::new(work, registration),
        }
    }

    /// Aborts the load in flight for `slot`, if any.
    pub fn cancel(&mut self, slot: LoadSlot) -> bool {
        match self.in_flight.remove(&slot) {
            Some(entry) => {
                entry.abort.abort();
                log::info!("Load {} on slot {} cancelled", entry.generation, slot.0);
                true
            }
            None => false,
        }
    }

    /// Number of slots with a load in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn is_pending(&self, slot: LoadSlot) -> bool {
        self.in_flight.contains_key(&slot)
    }

    /// Takes every queued completion that is still current for its slot.
    pub fn drain(&mut self) -> Vec<LoadCompletion> {
        let mut current = Vec::new();
        for completion in self.receiver.try_iter() {
            let is_current = self
                .in_flight
                .get(&completion.slot)
                .is_some_and(|entry| entry.generation == completion.generation);

            if is_current {
                self.in_flight.remove(&completion.slot);
                current.push(completion);
            } else {
                log::debug!(
                    "Discarding stale result of load {} ('{}')",
                    completion.generation,
                    completion.label
                );
            }
        }
        current
    }
}

/// A spawned-or-awaited load. Resolves once the result is queued, or
/// immediately if the load was superseded or cancelled.
#[must_use = "a load task does nothing unless polled"]
pub struct LoadTask {
    inner: Abortable<TaskFuture>,
}

impl LoadTask {
    /// Drives the load to completion on the current thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn block_on(self) {
        pollster::block_on(self);
    }
}

impl Future for LoadTask {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.inner.poll_unpin(cx).map(|_| ())
    }
}
