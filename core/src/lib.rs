//! # Campus Events Core
//!
//! Core traits and types for the campus-events client architecture.
//!
//! This crate provides the fundamental abstractions for the domain-state
//! synchronization layer: a pure [`reducer::Reducer`] over owned state, an
//! explicit [`effect::Effect`] description type, and the
//! [`environment::Clock`] dependency seam.
//!
//! ## Core Concepts
//!
//! - **State**: the in-memory mirror of server-owned domain records
//! - **Action**: confirmed outcomes applied to the mirror
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use campus_events_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for CatalogReducer {
//!     type State = CatalogState;
//!     type Action = CatalogAction;
//!     type Environment = CatalogEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CatalogState,
//!         action: CatalogAction,
//!         env: &CatalogEnvironment,
//!     ) -> SmallVec<[Effect<CatalogAction>; 4]> {
//!         // Apply the confirmed outcome, return any follow-up effects
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::SmallVec;

/// Reducer module - The core trait for state transitions.
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all local state-transition logic and are deterministic and
/// testable at memory speed.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions.
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Contract
    ///
    /// A single `reduce` call is the unit of atomicity: every state change
    /// it performs becomes visible to readers at once, never partially.
    /// Reducers must not perform I/O; anything asynchronous is returned as
    /// an [`Effect`] description for the runtime to execute.
    pub trait Reducer {
        /// The state type this reducer operates on.
        type State;

        /// The action type this reducer processes.
        type Action;

        /// The environment type with injected dependencies.
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// This is a pure function that:
        /// 1. Validates the action against current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most confirmations
        /// produce none; the inline capacity of 4 keeps the common case
        /// allocation-free.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side-effect descriptions.
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed.
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect.
        None,

        /// Run effects in parallel.
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel.
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap an async computation as an effect.
        ///
        /// The future's output action, if any, is fed back into the store.
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns `true` if this effect performs no work.
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - dependency injection traits.
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. This keeps reducers deterministic: a
/// reducer asked for "now" under test gets a fixed time, not the wall
/// clock.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_events_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let now = clock.now();
    /// assert!(now.timestamp() > 0);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time.
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[test]
    fn merge_wraps_effects_in_parallel() {
        let merged: Effect<()> = Effect::merge(vec![Effect::None, Effect::None]);
        match merged {
            Effect::Parallel(inner) => assert_eq!(inner.len(), 2),
            other => panic!("expected Parallel, got {other:?}"),
        }
    }

    #[test]
    fn none_effect_reports_no_work() {
        let effect: Effect<()> = Effect::None;
        assert!(effect.is_none());

        let effect: Effect<()> = Effect::future(async { None });
        assert!(!effect.is_none());
    }

    #[test]
    fn debug_formats_future_opaquely() {
        let effect: Effect<u32> = Effect::future(async { Some(1) });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn future_effect_yields_feedback_action() {
        let effect: Effect<u32> = Effect::future(async { Some(42) });
        match effect {
            Effect::Future(fut) => assert_eq!(tokio_test::block_on(fut), Some(42)),
            other => panic!("expected Future, got {other:?}"),
        }
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
