//! Catalog actions.
//!
//! Every variant is a *confirmed server outcome*: the Remote Data Service
//! owns validation and business rules (capacity, duplicates, auth), so the
//! client never applies a mutation speculatively. The imperative shell
//! awaits the server's answer, then dispatches exactly one of these
//! actions; the reducer applies it as a single atomic state change.

use crate::model::{Event, EventId, ParticipantId, Registration};
use serde::{Deserialize, Serialize};

/// Confirmed outcome applied to the catalog mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogAction {
    /// Both collections were (re)loaded from the server and replace the
    /// mirror wholesale.
    CatalogLoaded {
        /// Full event listing.
        events: Vec<Event>,
        /// Full registration listing.
        registrations: Vec<Registration>,
    },

    /// The server created an event.
    EventAdded {
        /// The server's representation, including the assigned identity.
        event: Event,
    },

    /// The server updated an event; the local record is replaced by the
    /// server's representation, matched by identity.
    EventReplaced {
        /// The server's representation.
        event: Event,
    },

    /// The server deleted an event.
    EventRemoved {
        /// Identity of the removed event.
        id: EventId,
    },

    /// The server accepted a registration. Appending the record and
    /// incrementing the event's counter happen in the same reduce call.
    RegistrationAdded {
        /// The server's registration record.
        registration: Registration,
    },

    /// The server cancelled a registration. Flipping the record's status
    /// and decrementing the event's counter happen in the same reduce
    /// call; the counter never goes below zero.
    RegistrationCancelled {
        /// Target event.
        event_id: EventId,
        /// Target participant.
        participant_id: ParticipantId,
    },

    /// The server recorded an attendance flag.
    AttendanceRecorded {
        /// Target event.
        event_id: EventId,
        /// Target participant.
        participant_id: ParticipantId,
        /// New attendance flag.
        attended: bool,
    },

    /// The server recorded a certificate payment flag.
    CertificatePaymentRecorded {
        /// Target event.
        event_id: EventId,
        /// Target participant.
        participant_id: ParticipantId,
        /// New certificate payment flag.
        certificate_paid: bool,
    },
}
