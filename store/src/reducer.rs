//! Reducer logic for the catalog mirror.
//!
//! Applies confirmed server outcomes to local state. Each reduce call is
//! the unit of atomicity: paired mutations (a registration record plus the
//! event's live counter) always land together, never half-applied.

use crate::actions::CatalogAction;
use crate::environment::CatalogEnvironment;
use crate::model::{Event, EventId, ParticipantId, Registration, RegistrationStatus};
use crate::state::CatalogState;
use campus_events_core::{effect::Effect, reducer::Reducer, SmallVec};
use chrono::{DateTime, Utc};

/// Reducer for the catalog mirror.
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn ingest(event: Event, now: DateTime<Utc>) -> Event {
        event.with_status(now)
    }

    fn apply_loaded(
        state: &mut CatalogState,
        events: Vec<Event>,
        registrations: Vec<Registration>,
        now: DateTime<Utc>,
    ) {
        state.events = events.into_iter().map(|e| Self::ingest(e, now)).collect();
        state.registrations = registrations;
    }

    fn apply_event_replaced(state: &mut CatalogState, event: Event, now: DateTime<Utc>) {
        let Some(index) = state.event_index(&event.id) else {
            tracing::warn!(event_id = %event.id, "Update confirmed for an event missing locally");
            return;
        };
        state.events[index] = Self::ingest(event, now);
    }

    fn apply_registration_added(state: &mut CatalogState, registration: Registration) {
        let event_id = registration.event_id.clone();
        state.registrations.push(registration);

        match state.event_mut(&event_id) {
            Some(event) => event.registered_count += 1,
            None => {
                tracing::warn!(%event_id, "Registration confirmed for an event missing locally");
            },
        }
    }

    fn apply_registration_cancelled(
        state: &mut CatalogState,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) {
        match Self::target_registration(state, event_id, participant_id) {
            Some(index) => {
                state.registrations[index].status = RegistrationStatus::Cancelled;
            },
            None => {
                tracing::warn!(
                    %event_id,
                    %participant_id,
                    "Cancellation confirmed for a registration missing locally"
                );
            },
        }

        if let Some(event) = state.event_mut(event_id) {
            event.registered_count = event.registered_count.saturating_sub(1);
        }
    }

    fn apply_attendance(
        state: &mut CatalogState,
        event_id: &EventId,
        participant_id: &ParticipantId,
        attended: bool,
    ) {
        match Self::target_registration(state, event_id, participant_id) {
            Some(index) => state.registrations[index].attended = attended,
            None => {
                tracing::warn!(
                    %event_id,
                    %participant_id,
                    "Attendance confirmed for a registration missing locally"
                );
            },
        }
    }

    fn apply_certificate(
        state: &mut CatalogState,
        event_id: &EventId,
        participant_id: &ParticipantId,
        certificate_paid: bool,
    ) {
        match Self::target_registration(state, event_id, participant_id) {
            Some(index) => state.registrations[index].certificate_paid = certificate_paid,
            None => {
                tracing::warn!(
                    %event_id,
                    %participant_id,
                    "Certificate payment confirmed for a registration missing locally"
                );
            },
        }
    }

    /// Pick the registration a pair-keyed update targets.
    ///
    /// Prefers the active record; with no active record, falls back to any
    /// match (a stale cancelled record). More than one active match means
    /// the mirror has diverged from the server's uniqueness rule and is
    /// reported, then resolved to the first match.
    fn target_registration(
        state: &CatalogState,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Option<usize> {
        let active = state.active_registration_indices(event_id, participant_id);
        if active.len() > 1 {
            tracing::warn!(
                %event_id,
                %participant_id,
                matches = active.len(),
                "Multiple active registrations for one (event, participant) pair"
            );
        }

        active
            .first()
            .copied()
            .or_else(|| state.any_registration_index(event_id, participant_id))
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let now = env.clock.now();

        match action {
            CatalogAction::CatalogLoaded {
                events,
                registrations,
            } => Self::apply_loaded(state, events, registrations, now),

            CatalogAction::EventAdded { event } => {
                state.events.push(Self::ingest(event, now));
            },

            CatalogAction::EventReplaced { event } => {
                Self::apply_event_replaced(state, event, now);
            },

            CatalogAction::EventRemoved { id } => {
                state.events.retain(|e| e.id != id);
            },

            CatalogAction::RegistrationAdded { registration } => {
                Self::apply_registration_added(state, registration);
            },

            CatalogAction::RegistrationCancelled {
                event_id,
                participant_id,
            } => {
                Self::apply_registration_cancelled(state, &event_id, &participant_id);
            },

            CatalogAction::AttendanceRecorded {
                event_id,
                participant_id,
                attended,
            } => {
                Self::apply_attendance(state, &event_id, &participant_id, attended);
            },

            CatalogAction::CertificatePaymentRecorded {
                event_id,
                participant_id,
                certificate_paid,
            } => {
                Self::apply_certificate(state, &event_id, &participant_id, certificate_paid);
            },
        }

        SmallVec::new()
    }
}
