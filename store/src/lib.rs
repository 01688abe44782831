//! # Campus Events Store
//!
//! Client-side domain-state synchronization layer for the campus events
//! platform: a strongly-typed, in-memory mirror of events, registrations,
//! and feedback, kept consistent with the Remote Data Service through
//! confirm-then-apply mutations.
//!
//! ## Architecture
//!
//! ```text
//! Consumer → CatalogStore (imperative shell)
//!              │  await remote call ──────────→ Remote Data Service
//!              │  confirmed outcome
//!              ▼
//!            Store::send(CatalogAction) → CatalogReducer (pure, atomic)
//! ```
//!
//! - The [`store::CatalogStore`] facade owns the session lifecycle:
//!   initial load, every operation of the catalog surface, reload,
//!   shutdown.
//! - The [`reducer::CatalogReducer`] applies confirmed server outcomes as
//!   single atomic state changes: a registration record and its event's
//!   live counter always land together.
//! - The [`providers::RemoteDataService`] trait abstracts the backend;
//!   [`gateway::HttpRemoteService`] implements it over reqwest, and
//!   [`mocks::MockRemoteService`] in memory.
//! - Event status (upcoming/ongoing/completed) is derived from the clock
//!   on every read path, never trusted from the wire.
//!
//! ## Example
//!
//! ```rust,ignore
//! use campus_events_store::{CatalogStore, GatewayConfig, HttpRemoteService};
//!
//! let gateway = HttpRemoteService::new(GatewayConfig::from_env());
//! let store = CatalogStore::connect(gateway).await;
//!
//! for event in store.events().await {
//!     println!("{} ({})", event.title, event.status.as_str());
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod auth;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod model;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::CatalogAction;
pub use auth::{AuthSession, Credentials, RegisterProfile, User, UserRole};
pub use error::{RemoteError, Result};
pub use gateway::{GatewayConfig, HttpRemoteService, TokenCell};
pub use model::{
    AttendanceUpdate, CertificateUpdate, Event, EventCategory, EventDraft, EventId, EventPatch,
    EventStatus, Feedback, FeedbackAuthor, FeedbackId, ImageAttachment, NewFeedback,
    ParticipantId, RatingSummary, Registration, RegistrationId, RegistrationRequest,
    RegistrationStatus,
};
pub use providers::RemoteDataService;
pub use reducer::CatalogReducer;
pub use state::CatalogState;
pub use store::CatalogStore;
