//! Remote Data Service provider trait.
//!
//! This module defines the interface to the backend consumed by the
//! catalog store. The trait enables dependency injection and makes the
//! synchronization logic testable:
//!
//! - **Testing**: use [`crate::mocks::MockRemoteService`] (in-memory,
//!   deterministic)
//! - **Production**: use [`crate::gateway::HttpRemoteService`] (reqwest)
//!
//! The provider is an **interface**, not an implementation: the backend
//! owns validation, capacity checks, identity assignment, and auth. The
//! store applies only what the provider confirms.

use crate::error::Result;
use crate::model::{
    AttendanceUpdate, CertificateUpdate, Event, EventDraft, EventId, EventPatch, Feedback,
    NewFeedback, RatingSummary, Registration, RegistrationRequest,
};
use std::future::Future;

/// The Remote Data Service contract.
///
/// Every method is a single HTTP round-trip equivalent; the store never
/// retries, queues, or reorders calls.
pub trait RemoteDataService: Send + Sync {
    /// List all events.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Create an event. The server assigns the identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the draft or the request
    /// fails.
    fn create_event(&self, draft: &EventDraft) -> impl Future<Output = Result<Event>> + Send;

    /// Partially update an event, returning the server's representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist, the server rejects
    /// the patch, or the request fails.
    fn update_event(
        &self,
        id: &EventId,
        patch: &EventPatch,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Delete an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the request fails.
    fn delete_event(&self, id: &EventId) -> impl Future<Output = Result<()>> + Send;

    /// List all registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    fn list_registrations(&self) -> impl Future<Output = Result<Vec<Registration>>> + Send;

    /// Register a participant for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is full, the participant is already
    /// registered, or the request fails. Capacity is enforced here, by
    /// the server - never client-side.
    fn create_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<Registration>> + Send;

    /// Cancel a registration, keyed by (event, participant).
    ///
    /// # Errors
    ///
    /// Returns an error if no active registration matches or the request
    /// fails.
    fn cancel_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Record an attendance flag, keyed by (event, participant).
    ///
    /// # Errors
    ///
    /// Returns an error if no registration matches or the request fails.
    fn set_attendance(&self, update: &AttendanceUpdate) -> impl Future<Output = Result<()>> + Send;

    /// Record a certificate payment flag, keyed by (event, participant).
    ///
    /// # Errors
    ///
    /// Returns an error if no registration matches or the request fails.
    fn set_certificate_paid(
        &self,
        update: &CertificateUpdate,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Submit feedback. The server assigns the identity and populates the
    /// author.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the feedback or the request
    /// fails.
    fn submit_feedback(&self, feedback: &NewFeedback)
        -> impl Future<Output = Result<Feedback>> + Send;

    /// All feedback for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    fn feedback_for_event(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<Feedback>>> + Send;

    /// Aggregate rating for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    fn average_rating(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<RatingSummary>> + Send;
}
