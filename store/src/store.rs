//! The catalog store facade.
//!
//! [`CatalogStore`] is the session-scoped synchronization layer between
//! consumers (UI pages, dashboards) and the Remote Data Service. Every
//! mutation is **confirm-then-apply**: the remote call completes first,
//! and only a confirmed outcome is dispatched to the reducer, as a single
//! atomic state change. Failures are caught, logged, and surfaced as
//! explicit negative results; there is no retry, no offline queue, and no
//! background work.

use crate::actions::CatalogAction;
use crate::environment::CatalogEnvironment;
use crate::error::Result;
use crate::model::{
    AttendanceUpdate, CertificateUpdate, Event, EventDraft, EventId, EventPatch, Feedback,
    NewFeedback, ParticipantId, RatingSummary, Registration, RegistrationRequest,
};
use crate::providers::RemoteDataService;
use crate::reducer::CatalogReducer;
use crate::state::CatalogState;
use campus_events_core::environment::{Clock, SystemClock};
use campus_events_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Session-scoped mirror of the event catalog.
///
/// Constructed once per client session via [`connect`], injected into
/// consumers, and discarded (optionally via [`shutdown`]) on teardown.
/// Consumers receive owned snapshots from every accessor; nothing hands
/// out live references into the mirror.
///
/// [`connect`]: CatalogStore::connect
/// [`shutdown`]: CatalogStore::shutdown
pub struct CatalogStore<R>
where
    R: RemoteDataService,
{
    remote: R,
    clock: Arc<dyn Clock>,
    store: Store<CatalogState, CatalogAction, CatalogEnvironment, CatalogReducer>,
}

impl<R> CatalogStore<R>
where
    R: RemoteDataService,
{
    /// Connect with the system clock.
    ///
    /// Issues the two initial reads (events, registrations). A failed
    /// read is logged and leaves that collection empty; [`reload`] is
    /// always available to recover.
    ///
    /// [`reload`]: CatalogStore::reload
    pub async fn connect(remote: R) -> Self {
        Self::connect_with_clock(remote, Arc::new(SystemClock)).await
    }

    /// Connect with an injected clock (fixed under test).
    pub async fn connect_with_clock(remote: R, clock: Arc<dyn Clock>) -> Self {
        let store = Store::new(
            CatalogState::new(),
            CatalogReducer::new(),
            CatalogEnvironment::new(Arc::clone(&clock)),
        );
        let this = Self {
            remote,
            clock,
            store,
        };
        this.reload().await;
        this
    }

    /// Re-run the initialization load, replacing both collections
    /// wholesale. The recovery hatch for any suspected divergence between
    /// mirror and server.
    pub async fn reload(&self) {
        let events = match self.remote.list_events().await {
            Ok(events) => events,
            Err(error) => {
                tracing::error!(%error, "Failed to load events");
                Vec::new()
            },
        };

        let registrations = match self.remote.list_registrations().await {
            Ok(registrations) => registrations,
            Err(error) => {
                tracing::error!(%error, "Failed to load registrations");
                Vec::new()
            },
        };

        self.dispatch(CatalogAction::CatalogLoaded {
            events,
            registrations,
        })
        .await;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reads (local, synchronous against the mirror)
    // ═══════════════════════════════════════════════════════════════════

    /// All events, with status freshly derived at call time.
    pub async fn events(&self) -> Vec<Event> {
        let now = self.clock.now();
        self.store
            .state(|s| s.events.iter().map(|e| e.clone().with_status(now)).collect())
            .await
    }

    /// Look up an event in the mirror. Does not re-fetch from the server.
    pub async fn event_by_id(&self, id: &EventId) -> Option<Event> {
        let now = self.clock.now();
        self.store
            .state(|s| s.event(id).map(|e| e.clone().with_status(now)))
            .await
    }

    /// All registrations in the mirror, active and cancelled.
    pub async fn registrations(&self) -> Vec<Registration> {
        self.store.state(|s| s.registrations.clone()).await
    }

    /// All of a participant's registrations, regardless of status.
    pub async fn registrations_for_participant(
        &self,
        participant_id: &ParticipantId,
    ) -> Vec<Registration> {
        self.store
            .state(|s| s.registrations_for(participant_id))
            .await
    }

    // ═══════════════════════════════════════════════════════════════════
    // Event CRUD
    // ═══════════════════════════════════════════════════════════════════

    /// Create an event.
    ///
    /// The mirror is only touched after the server confirms; the
    /// server-assigned identity is never guessed at. Returns `None` on
    /// failure, leaving local state untouched.
    pub async fn create_event(&self, draft: EventDraft) -> Option<Event> {
        match self.remote.create_event(&draft).await {
            Ok(event) => {
                let event = event.with_status(self.clock.now());
                self.dispatch(CatalogAction::EventAdded {
                    event: event.clone(),
                })
                .await;
                Some(event)
            },
            Err(error) => {
                tracing::error!(%error, "Failed to create event");
                None
            },
        }
    }

    /// Partially update an event, replacing the mirrored record with the
    /// server's representation. Returns `None` on failure, leaving the
    /// prior record intact.
    pub async fn update_event(&self, id: &EventId, patch: EventPatch) -> Option<Event> {
        match self.remote.update_event(id, &patch).await {
            Ok(event) => {
                let event = event.with_status(self.clock.now());
                self.dispatch(CatalogAction::EventReplaced {
                    event: event.clone(),
                })
                .await;
                Some(event)
            },
            Err(error) => {
                tracing::error!(%error, event_id = %id, "Failed to update event");
                None
            },
        }
    }

    /// Delete an event. Returns `false` on failure, leaving the mirror
    /// untouched.
    pub async fn delete_event(&self, id: &EventId) -> bool {
        match self.remote.delete_event(id).await {
            Ok(()) => {
                self.dispatch(CatalogAction::EventRemoved { id: id.clone() })
                    .await;
                true
            },
            Err(error) => {
                tracing::error!(%error, event_id = %id, "Failed to delete event");
                false
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Registration lifecycle
    // ═══════════════════════════════════════════════════════════════════

    /// Register a participant for an event.
    ///
    /// On success the registration record and the event's live counter
    /// land in the same atomic state change. Server rejections (capacity,
    /// duplicates) propagate to the caller with no local mutation.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    pub async fn register_for_event(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Result<Registration> {
        let request = RegistrationRequest {
            event_id: event_id.clone(),
            participant_id: participant_id.clone(),
        };

        match self.remote.create_registration(&request).await {
            Ok(registration) => {
                self.dispatch(CatalogAction::RegistrationAdded {
                    registration: registration.clone(),
                })
                .await;
                Ok(registration)
            },
            Err(error) => {
                tracing::warn!(%error, %event_id, %participant_id, "Registration rejected");
                Err(error)
            },
        }
    }

    /// Cancel a registration, keyed by (event, participant). The record
    /// is flipped to cancelled and retained; the counter decrement floors
    /// at zero.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    pub async fn cancel_registration(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Result<()> {
        let request = RegistrationRequest {
            event_id: event_id.clone(),
            participant_id: participant_id.clone(),
        };

        match self.remote.cancel_registration(&request).await {
            Ok(()) => {
                self.dispatch(CatalogAction::RegistrationCancelled {
                    event_id: event_id.clone(),
                    participant_id: participant_id.clone(),
                })
                .await;
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, %event_id, %participant_id, "Cancellation rejected");
                Err(error)
            },
        }
    }

    /// Record attendance for a registration.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    pub async fn mark_attendance(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
        attended: bool,
    ) -> Result<()> {
        let update = AttendanceUpdate {
            event_id: event_id.clone(),
            participant_id: participant_id.clone(),
            attended,
        };

        match self.remote.set_attendance(&update).await {
            Ok(()) => {
                self.dispatch(CatalogAction::AttendanceRecorded {
                    event_id: event_id.clone(),
                    participant_id: participant_id.clone(),
                    attended,
                })
                .await;
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, %event_id, %participant_id, "Attendance update rejected");
                Err(error)
            },
        }
    }

    /// Record certificate payment for a registration.
    ///
    /// # Errors
    ///
    /// Returns the remote failure verbatim.
    pub async fn mark_certificate_paid(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
        certificate_paid: bool,
    ) -> Result<()> {
        let update = CertificateUpdate {
            event_id: event_id.clone(),
            participant_id: participant_id.clone(),
            certificate_paid,
        };

        match self.remote.set_certificate_paid(&update).await {
            Ok(()) => {
                self.dispatch(CatalogAction::CertificatePaymentRecorded {
                    event_id: event_id.clone(),
                    participant_id: participant_id.clone(),
                    certificate_paid,
                })
                .await;
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, %event_id, %participant_id, "Certificate update rejected");
                Err(error)
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Feedback (passthrough; the mirror holds no feedback collection)
    // ═══════════════════════════════════════════════════════════════════

    /// Submit feedback, forwarded verbatim. Callers append the returned
    /// record to whatever feedback list they maintain.
    pub async fn submit_feedback(&self, feedback: NewFeedback) -> Option<Feedback> {
        match self.remote.submit_feedback(&feedback).await {
            Ok(created) => Some(created),
            Err(error) => {
                tracing::error!(%error, event_id = %feedback.event_id, "Failed to submit feedback");
                None
            },
        }
    }

    /// All feedback for an event. Failures are logged and yield an empty
    /// list.
    pub async fn feedback_for_event(&self, event_id: &EventId) -> Vec<Feedback> {
        match self.remote.feedback_for_event(event_id).await {
            Ok(feedback) => feedback,
            Err(error) => {
                tracing::error!(%error, %event_id, "Failed to fetch feedback");
                Vec::new()
            },
        }
    }

    /// Aggregate rating for an event. Failures are logged and yield a
    /// zero summary.
    pub async fn average_rating(&self, event_id: &EventId) -> RatingSummary {
        match self.remote.average_rating(event_id).await {
            Ok(summary) => summary,
            Err(error) => {
                tracing::error!(%error, %event_id, "Failed to fetch average rating");
                RatingSummary::default()
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════

    /// Gracefully tear the store down, rejecting further mutations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if pending work outlives
    /// the timeout.
    pub async fn shutdown(&self, timeout: Duration) -> std::result::Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }

    async fn dispatch(&self, action: CatalogAction) {
        if let Err(error) = self.store.send(action).await {
            tracing::warn!(%error, "Confirmed outcome dropped by the store");
        }
    }
}
