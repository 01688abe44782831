//! # Campus Events Runtime
//!
//! Runtime implementation for the campus-events client architecture.
//!
//! This crate provides the [`Store`]: the imperative shell that owns domain
//! state, serializes reducer application behind a write lock, and executes
//! the effects a reducer returns on spawned tasks whose produced actions
//! feed back into the store.
//!
//! ## Concurrency model
//!
//! - The reducer executes synchronously while holding the state write lock,
//!   so a single `reduce` call is atomic from any reader's point of view.
//! - Effects execute asynchronously; `send()` returns after starting them,
//!   and [`EffectHandle::wait`] can be used to await completion.
//! - Concurrent `send()` calls serialize at the reducer; effect completions
//!   are unordered (last writer wins per record).
//!
//! The store deliberately has no retry policy, no dead-letter queue, and no
//! circuit breaker: callers receive failures exactly once and decide for
//! themselves.

use campus_events_core::effect::Effect;
use campus_events_core::reducer::Reducer;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Notify, RwLock};

/// Errors produced by the [`Store`] runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is shutting down and rejects new actions.
    #[error("Store is shutting down")]
    ShutdownInProgress,

    /// Shutdown timed out with effects still running.
    #[error("Shutdown timeout: {0} effects still running")]
    ShutdownTimeout(usize),

    /// A wait on effect completion timed out.
    #[error("Timed out waiting for effects to complete")]
    Timeout,
}

/// Tracks completion of the effects spawned by a single `send()` call.
///
/// Returned by [`Store::send`]. Dropping the handle detaches from the
/// effects; they keep running to completion.
#[derive(Debug)]
pub struct EffectHandle {
    remaining: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl EffectHandle {
    fn new() -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(0)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// A handle whose effects have already completed.
    #[must_use]
    pub fn completed() -> Self {
        Self::new()
    }

    fn tracker(&self) -> EffectTracker {
        EffectTracker {
            remaining: Arc::clone(&self.remaining),
            notify: Arc::clone(&self.notify),
        }
    }

    /// Number of effects from this send still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Wait until every effect spawned by this send has completed.
    pub async fn wait(&self) {
        loop {
            // Register interest before checking, so a completion between the
            // check and the await still wakes us.
            let mut notified = std::pin::pin!(self.notify.notified());
            notified.as_mut().enable();
            if self.remaining.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait for effect completion with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// the timeout expires.
    pub async fn wait_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// Shared increment/decrement side of an [`EffectHandle`].
#[derive(Debug, Clone)]
struct EffectTracker {
    remaining: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl EffectTracker {
    fn increment(&self) {
        self.remaining.fetch_add(1, Ordering::AcqRel);
    }

    fn decrement(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.notify.notify_waiters();
        }
    }
}

/// Decrements both the per-send and the store-wide effect counters when the
/// effect task finishes, even if the future inside it panics.
struct DecrementGuard {
    tracker: EffectTracker,
    store_pending: EffectTracker,
}

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.tracker.decrement();
        self.store_pending.decrement();
    }
}

struct StoreInner<S, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    pending: EffectTracker,
}

/// The Store - owns state and drives the reducer.
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (state-transition logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with action feedback loop)
///
/// # Example
///
/// ```ignore
/// let store = Store::new(CatalogState::default(), CatalogReducer, env);
///
/// store.send(CatalogAction::EventAdded { event }).await?;
/// let count = store.state(|s| s.events.len()).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<StoreInner<S, E, R>>,
    _marker: std::marker::PhantomData<fn(A)>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending: EffectTracker {
                    remaining: Arc::new(AtomicUsize::new(0)),
                    notify: Arc::new(Notify::new()),
                },
            }),
            _marker: std::marker::PhantomData,
        }
    }

    /// Send an action to the store.
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes returned effects asynchronously
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send()` returns after starting effect execution, not completion;
    /// use the returned [`EffectHandle`] to wait.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            metrics::counter!("store.send.rejected").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.send").increment(1);

        let effects = {
            let mut state = self.inner.state.write().await;
            self.inner
                .reducer
                .reduce(&mut state, action, &self.inner.environment)
        };

        let handle = EffectHandle::new();
        let tracker = handle.tracker();
        for effect in effects {
            self.spawn_effect(effect, &tracker);
        }

        Ok(handle)
    }

    /// Read the current state through a closure.
    ///
    /// The closure receives a shared reference and should return owned
    /// data; callers must treat results as snapshots, not live views.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Number of effects currently running across all sends.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.inner.pending.remaining.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown of the store.
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires with
    /// effects still running.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.inner.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects();

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(
                    pending_effects = pending,
                    "Shutdown timeout: {} effects still running",
                    pending
                );
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    fn spawn_effect(&self, effect: Effect<A>, tracker: &EffectTracker) {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                for effect in effects {
                    self.spawn_effect(effect, tracker);
                }
            },
            Effect::Future(fut) => {
                tracker.increment();
                self.inner.pending.increment();

                let guard = DecrementGuard {
                    tracker: tracker.clone(),
                    store_pending: self.inner.pending.clone(),
                };
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = guard;

                    if let Some(next) = fut.await {
                        // Feedback actions re-enter through send(); their own
                        // effects are tracked on the store-wide counter.
                        if let Err(error) = Box::pin(store.send(next)).await {
                            tracing::warn!(%error, "Dropped feedback action");
                        }
                    }
                });
            },
        }
    }
}
