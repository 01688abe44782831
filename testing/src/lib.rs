//! # Campus Events Testing
//!
//! Testing utilities and helpers for the campus-events client
//! architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: a fluent Given-When-Then harness for reducers
//! - [`assertions`]: helpers for asserting on returned effects
//! - [`mocks::FixedClock`]: deterministic time for status derivation
//!
//! ## Example
//!
//! ```ignore
//! use campus_events_testing::{assertions, mocks::FixedClock, ReducerTest};
//!
//! ReducerTest::new(CatalogReducer::new())
//!     .with_env(CatalogEnvironment::new(Arc::new(FixedClock::at(noon))))
//!     .given_state(CatalogState::new())
//!     .when_action(CatalogAction::EventAdded { event })
//!     .then_state(|state| assert_eq!(state.events.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod mocks;
mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};
