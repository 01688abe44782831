//! Domain record types.
//!
//! This module defines the records mirrored from the Remote Data Service.
//! All types are `Clone` to support the functional architecture pattern,
//! and all wire representations are camelCase JSON with `_id` as the
//! identity key, matching the backend contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for an event.
///
/// Identities are opaque and server-assigned; the client never mints one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

/// Unique identifier for a participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

/// Unique identifier for a registration record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(pub String);

/// Unique identifier for a feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a server-assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(EventId);
opaque_id!(ParticipantId);
opaque_id!(RegistrationId);
opaque_id!(FeedbackId);

// ═══════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Technical events (hackathons, coding contests, tech talks).
    Technical,
    /// Cultural events.
    Cultural,
    /// Sports events.
    Sports,
    /// Academic events (seminars, guest lectures).
    Academic,
    /// Workshops.
    Workshop,
}

impl EventCategory {
    /// Get the category name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Cultural => "cultural",
            Self::Sports => "sports",
            Self::Academic => "academic",
            Self::Workshop => "workshop",
        }
    }
}

/// Time-derived classification of an event.
///
/// Status is a pure function of (now, start, end). It is recomputed on
/// every read path and never treated as authoritative, even though the
/// wire representation carries a `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The event has not started yet.
    #[default]
    Upcoming,
    /// The event is currently running.
    Ongoing,
    /// The event has ended.
    Completed,
}

impl EventStatus {
    /// Derive the status of an event window at a given instant.
    ///
    /// Pure and idempotent: the same inputs always yield the same output.
    #[must_use]
    pub fn derive(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < starts_at {
            Self::Upcoming
        } else if now <= ends_at {
            Self::Ongoing
        } else {
            Self::Completed
        }
    }

    /// Get the status name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }
}

/// A schedulable activity with a time window, venue, capacity, and
/// approval state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: EventId,

    /// Event title.
    pub title: String,

    /// Event description.
    pub description: String,

    /// Event category.
    pub category: EventCategory,

    /// Start of the event window.
    #[serde(rename = "startDateTime")]
    pub starts_at: DateTime<Utc>,

    /// End of the event window.
    #[serde(rename = "endDateTime")]
    pub ends_at: DateTime<Utc>,

    /// Venue name.
    pub venue: String,

    /// Identity of the organizing user.
    pub organizer_id: ParticipantId,

    /// Display name of the organizer.
    pub organizer_name: String,

    /// Organizing department.
    pub department: String,

    /// Registration capacity.
    pub max_participants: u32,

    /// Live registration counter, mirrored from the server and kept in
    /// step with local registration confirmations.
    pub registered_count: u32,

    /// Derived status. Recomputed from the event window on every read;
    /// the value received on the wire is ignored.
    #[serde(default)]
    pub status: EventStatus,

    /// Whether an admin has approved the event for listing.
    pub approved: bool,

    /// Optional poster/banner image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional certificate fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_fee: Option<f64>,

    /// Free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Server-side creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Server-side update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Derive this event's status at the given instant.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        EventStatus::derive(self.starts_at, self.ends_at, now)
    }

    /// Return the event with its `status` field freshly derived.
    #[must_use]
    pub fn with_status(mut self, now: DateTime<Utc>) -> Self {
        self.status = self.status_at(now);
        self
    }

    /// Whether the event has reached its registration capacity.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.registered_count >= self.max_participants
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registrations
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a registration.
///
/// Cancelled registrations are retained for history, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Active claim on the event's capacity.
    Registered,
    /// Cancelled; retained as a historical record.
    Cancelled,
}

impl RegistrationStatus {
    /// Whether this status counts against event capacity.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

/// A participant's claim on an event's capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: RegistrationId,

    /// The event this registration belongs to.
    pub event_id: EventId,

    /// The registered participant.
    pub participant_id: ParticipantId,

    /// Lifecycle status.
    pub status: RegistrationStatus,

    /// Whether the participant attended the event.
    #[serde(default)]
    pub attended: bool,

    /// Whether the certificate fee has been paid.
    #[serde(default)]
    pub certificate_paid: bool,

    /// Server-side creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Server-side update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// Whether this registration matches an (event, participant) pair.
    #[must_use]
    pub fn matches(&self, event_id: &EventId, participant_id: &ParticipantId) -> bool {
        self.event_id == *event_id && self.participant_id == *participant_id
    }

    /// Whether this registration is an active claim on the pair.
    #[must_use]
    pub fn is_active_for(&self, event_id: &EventId, participant_id: &ParticipantId) -> bool {
        self.matches(event_id, participant_id) && self.status.is_active()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Feedback
// ═══════════════════════════════════════════════════════════════════════

/// The author of a feedback record, as populated by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAuthor {
    /// Participant identity.
    #[serde(rename = "_id")]
    pub id: ParticipantId,

    /// Display name.
    pub full_name: String,

    /// Email address.
    pub email: String,
}

/// A participant's post-event rating and comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Server-assigned identity.
    #[serde(rename = "_id")]
    pub id: FeedbackId,

    /// The event this feedback is about.
    pub event_id: EventId,

    /// Rating, 1-5.
    pub rating: u8,

    /// Optional free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Author details, populated by the server.
    pub participant: FeedbackAuthor,

    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Server-side update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating for an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean rating across all feedback for the event.
    pub average_rating: f64,

    /// Number of feedback records.
    pub count: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// Request Payloads
// ═══════════════════════════════════════════════════════════════════════

/// An image file attached to an event create/update.
///
/// Presence of an attachment switches the gateway from a JSON body to a
/// multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    /// File name reported to the server.
    pub file_name: String,

    /// MIME type, e.g. `image/png`.
    pub content_type: String,

    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Event category.
    pub category: EventCategory,
    /// Start of the event window.
    #[serde(rename = "startDateTime")]
    pub starts_at: DateTime<Utc>,
    /// End of the event window.
    #[serde(rename = "endDateTime")]
    pub ends_at: DateTime<Utc>,
    /// Venue name.
    pub venue: String,
    /// Identity of the organizing user.
    pub organizer_id: ParticipantId,
    /// Display name of the organizer.
    pub organizer_name: String,
    /// Organizing department.
    pub department: String,
    /// Registration capacity.
    pub max_participants: u32,
    /// Optional certificate fee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_fee: Option<f64>,
    /// Free-text tags.
    pub tags: Vec<String>,
    /// Optional image attachment. Not serialized; carried to the gateway
    /// out of band.
    #[serde(skip)]
    pub image: Option<ImageAttachment>,
}

/// Partial update for an event. Only set fields are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    /// New start of the event window.
    #[serde(rename = "startDateTime", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    /// New end of the event window.
    #[serde(rename = "endDateTime", skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// New venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// New department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// New capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    /// New certificate fee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_fee: Option<f64>,
    /// Replacement tag set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Approval flag (admin only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    /// Optional replacement image. Not serialized; carried to the gateway
    /// out of band.
    #[serde(skip)]
    pub image: Option<ImageAttachment>,
}

/// Request body keying a registration lifecycle operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Target event.
    pub event_id: EventId,
    /// Target participant.
    pub participant_id: ParticipantId,
}

/// Request body for the attendance flag update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    /// Target event.
    pub event_id: EventId,
    /// Target participant.
    pub participant_id: ParticipantId,
    /// New attendance flag.
    pub attended: bool,
}

/// Request body for the certificate payment flag update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateUpdate {
    /// Target event.
    pub event_id: EventId,
    /// Target participant.
    pub participant_id: ParticipantId,
    /// New certificate payment flag.
    pub certificate_paid: bool,
}

/// Payload for submitting feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    /// Target event.
    pub event_id: EventId,
    /// Authoring participant.
    pub participant_id: ParticipantId,
    /// Rating, 1-5.
    pub rating: u8,
    /// Optional free-text comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).single().unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().unwrap();
        (start, end)
    }

    #[test]
    fn status_derivation_across_the_window() {
        let (start, end) = window();

        let before = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().unwrap();
        let during = Utc.with_ymd_and_hms(2025, 1, 1, 11, 0, 0).single().unwrap();
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 13, 0, 0).single().unwrap();

        assert_eq!(EventStatus::derive(start, end, before), EventStatus::Upcoming);
        assert_eq!(EventStatus::derive(start, end, during), EventStatus::Ongoing);
        assert_eq!(EventStatus::derive(start, end, after), EventStatus::Completed);
    }

    #[test]
    fn status_boundaries_are_inclusive() {
        let (start, end) = window();
        assert_eq!(EventStatus::derive(start, end, start), EventStatus::Ongoing);
        assert_eq!(EventStatus::derive(start, end, end), EventStatus::Ongoing);
    }

    proptest! {
        #[test]
        fn derivation_is_total_and_idempotent(
            start_s in 0_i64..2_000_000_000,
            len_s in 0_i64..10_000_000,
            now_s in 0_i64..2_100_000_000,
        ) {
            let start = Utc.timestamp_opt(start_s, 0).single().unwrap();
            let end = Utc.timestamp_opt(start_s + len_s, 0).single().unwrap();
            let now = Utc.timestamp_opt(now_s, 0).single().unwrap();

            let first = EventStatus::derive(start, end, now);
            let second = EventStatus::derive(start, end, now);
            prop_assert_eq!(first, second);

            match first {
                EventStatus::Upcoming => prop_assert!(now < start),
                EventStatus::Ongoing => prop_assert!(start <= now && now <= end),
                EventStatus::Completed => prop_assert!(now > end),
            }
        }
    }

    #[test]
    fn event_wire_format_uses_backend_field_names() {
        let json = serde_json::json!({
            "_id": "evt-1",
            "title": "Robotics Workshop",
            "description": "Hands-on session",
            "category": "workshop",
            "startDateTime": "2025-01-01T10:00:00Z",
            "endDateTime": "2025-01-01T12:00:00Z",
            "venue": "Lab 3",
            "organizerId": "org-9",
            "organizerName": "Tech Club",
            "department": "CSE",
            "maxParticipants": 40,
            "registeredCount": 12,
            "status": "upcoming",
            "approved": true,
            "tags": ["robotics", "beginner"]
        });

        let event: Event = serde_json::from_value(json).unwrap();
        assert_eq!(event.id, EventId::from("evt-1"));
        assert_eq!(event.category, EventCategory::Workshop);
        assert_eq!(event.max_participants, 40);
        assert_eq!(event.registered_count, 12);
        assert_eq!(event.tags.len(), 2);
        assert!(event.created_at.is_none());
    }

    #[test]
    fn wire_status_is_ignored_in_favor_of_derivation() {
        let (start, end) = window();
        let event = Event {
            id: EventId::from("evt-1"),
            title: String::new(),
            description: String::new(),
            category: EventCategory::Technical,
            starts_at: start,
            ends_at: end,
            venue: String::new(),
            organizer_id: ParticipantId::from("org-1"),
            organizer_name: String::new(),
            department: String::new(),
            max_participants: 10,
            registered_count: 0,
            status: EventStatus::Completed, // stale wire value
            approved: true,
            image_url: None,
            certificate_fee: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        };

        let before = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().unwrap();
        assert_eq!(event.with_status(before).status, EventStatus::Upcoming);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = EventPatch {
            approved: Some(true),
            ..EventPatch::default()
        };

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "approved": true }));
    }

    #[test]
    fn capacity_check() {
        let (start, end) = window();
        let mut event = Event {
            id: EventId::from("evt-1"),
            title: String::new(),
            description: String::new(),
            category: EventCategory::Sports,
            starts_at: start,
            ends_at: end,
            venue: String::new(),
            organizer_id: ParticipantId::from("org-1"),
            organizer_name: String::new(),
            department: String::new(),
            max_participants: 2,
            registered_count: 1,
            status: EventStatus::Upcoming,
            approved: true,
            image_url: None,
            certificate_fee: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        };

        assert!(!event.is_full());
        event.registered_count = 2;
        assert!(event.is_full());
    }
}
