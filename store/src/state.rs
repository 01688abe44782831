//! In-memory mirror of the server-owned catalog.

use crate::model::{Event, EventId, ParticipantId, Registration};
use serde::{Deserialize, Serialize};

/// The client-side mirror of events and registrations.
///
/// Owned exclusively by the store for the lifetime of a session:
/// initialized empty, populated by the initial load, discarded on
/// teardown. The Remote Data Service owns the durable copies; this is a
/// read-through/write-through cache, not a source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    /// All known events, in server listing order.
    pub events: Vec<Event>,

    /// All known registrations, active and cancelled.
    pub registrations: Vec<Registration>,
}

impl CatalogState {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            registrations: Vec::new(),
        }
    }

    /// Look up an event by identity.
    #[must_use]
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == *id)
    }

    /// Mutable lookup of an event by identity.
    pub fn event_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == *id)
    }

    /// Index of an event by identity.
    #[must_use]
    pub fn event_index(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id == *id)
    }

    /// All registrations for a participant, regardless of status.
    #[must_use]
    pub fn registrations_for(&self, participant_id: &ParticipantId) -> Vec<Registration> {
        self.registrations
            .iter()
            .filter(|r| r.participant_id == *participant_id)
            .cloned()
            .collect()
    }

    /// Indices of active registrations matching an (event, participant)
    /// pair. At most one should exist; more indicates divergence from the
    /// server.
    #[must_use]
    pub fn active_registration_indices(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Vec<usize> {
        self.registrations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_active_for(event_id, participant_id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of any registration matching the pair, active or not.
    #[must_use]
    pub fn any_registration_index(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Option<usize> {
        self.registrations
            .iter()
            .position(|r| r.matches(event_id, participant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RegistrationId, RegistrationStatus};

    fn registration(id: &str, event: &str, participant: &str, status: RegistrationStatus) -> Registration {
        Registration {
            id: RegistrationId::from(id),
            event_id: EventId::from(event),
            participant_id: ParticipantId::from(participant),
            status,
            attended: false,
            certificate_paid: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn registrations_for_returns_all_statuses() {
        let state = CatalogState {
            events: Vec::new(),
            registrations: vec![
                registration("r1", "e1", "alice", RegistrationStatus::Cancelled),
                registration("r2", "e2", "alice", RegistrationStatus::Registered),
                registration("r3", "e1", "bob", RegistrationStatus::Registered),
            ],
        };

        let alice = state.registrations_for(&ParticipantId::from("alice"));
        assert_eq!(alice.len(), 2);
    }

    #[test]
    fn active_lookup_skips_cancelled_records() {
        let state = CatalogState {
            events: Vec::new(),
            registrations: vec![
                registration("r1", "e1", "alice", RegistrationStatus::Cancelled),
                registration("r2", "e1", "alice", RegistrationStatus::Registered),
            ],
        };

        let event = EventId::from("e1");
        let alice = ParticipantId::from("alice");

        assert_eq!(state.active_registration_indices(&event, &alice), vec![1]);
        assert_eq!(state.any_registration_index(&event, &alice), Some(0));
    }

    #[test]
    fn lookups_miss_cleanly_on_empty_state() {
        let state = CatalogState::new();
        assert!(state.event(&EventId::from("missing")).is_none());
        assert!(state.registrations_for(&ParticipantId::from("nobody")).is_empty());
    }
}
