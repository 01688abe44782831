//! End-to-end facade tests over the in-memory mock backend.
//!
//! These exercise the full confirm-then-apply path: facade operation →
//! mock Remote Data Service → confirmation action → reducer → mirror.

use campus_events_store::mocks::MockRemoteService;
use campus_events_store::{
    CatalogStore, Event, EventCategory, EventDraft, EventId, EventStatus, NewFeedback,
    ParticipantId, RatingSummary, Registration, RegistrationId, RegistrationStatus, RemoteError,
};
use campus_events_testing::mocks::FixedClock;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

fn morning() -> DateTime<Utc> {
    // One hour before the standard test event window opens.
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().unwrap()
}

fn seeded_event(id: &str, max_participants: u32, registered_count: u32) -> Event {
    Event {
        id: EventId::from(id),
        title: format!("Event {id}"),
        description: "A seeded event".to_string(),
        category: EventCategory::Technical,
        starts_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).single().unwrap(),
        ends_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap(),
        venue: "Auditorium".to_string(),
        organizer_id: ParticipantId::from("org-1"),
        organizer_name: "Tech Club".to_string(),
        department: "CSE".to_string(),
        max_participants,
        registered_count,
        status: EventStatus::Upcoming,
        approved: true,
        image_url: None,
        certificate_fee: None,
        tags: vec!["seeded".to_string()],
        created_at: None,
        updated_at: None,
    }
}

fn draft(title: &str) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: "Drafted".to_string(),
        category: EventCategory::Workshop,
        starts_at: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).single().unwrap(),
        ends_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap(),
        venue: "Lab 2".to_string(),
        organizer_id: ParticipantId::from("org-1"),
        organizer_name: "Tech Club".to_string(),
        department: "CSE".to_string(),
        max_participants: 30,
        certificate_fee: None,
        tags: Vec::new(),
        image: None,
    }
}

async fn connect(
    remote: &MockRemoteService,
    clock: &FixedClock,
) -> CatalogStore<MockRemoteService> {
    CatalogStore::connect_with_clock(remote.clone(), Arc::new(clock.clone())).await
}

#[tokio::test]
async fn connect_loads_both_collections() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 0));
    remote.seed_event(seeded_event("e2", 10, 0));
    remote.seed_registration(Registration {
        id: RegistrationId::from("r1"),
        event_id: EventId::from("e1"),
        participant_id: ParticipantId::from("alice"),
        status: RegistrationStatus::Registered,
        attended: false,
        certificate_paid: false,
        created_at: None,
        updated_at: None,
    });

    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    assert_eq!(store.events().await.len(), 2);
    assert_eq!(store.registrations().await.len(), 1);
    assert_eq!(remote.call_count("list_events"), 1);
    assert_eq!(remote.call_count("list_registrations"), 1);
}

#[tokio::test]
async fn failed_initial_read_leaves_that_collection_empty() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 0));
    // One-shot failure hits the first read (events); registrations load.
    remote.fail_next(RemoteError::Transport("connection refused".to_string()));

    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    assert!(store.events().await.is_empty());

    // Manual reload recovers.
    store.reload().await;
    assert_eq!(store.events().await.len(), 1);
}

#[tokio::test]
async fn status_is_derived_at_read_time_not_load_time() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 0));

    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;
    let id = EventId::from("e1");

    // 09:00 for a 10:00-12:00 event
    assert_eq!(store.event_by_id(&id).await.unwrap().status, EventStatus::Upcoming);

    clock.advance(Duration::hours(2)); // 11:00
    assert_eq!(store.event_by_id(&id).await.unwrap().status, EventStatus::Ongoing);

    clock.advance(Duration::hours(2)); // 13:00
    assert_eq!(store.event_by_id(&id).await.unwrap().status, EventStatus::Completed);
}

#[tokio::test]
async fn create_event_applies_only_after_confirmation() {
    let remote = MockRemoteService::new();
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let created = store.create_event(draft("Rust 101")).await.unwrap();

    // Server assigned the identity; the mirror agrees with the returned
    // record.
    let mirrored = store.event_by_id(&created.id).await.unwrap();
    assert_eq!(mirrored, created);
    assert_eq!(created.status, EventStatus::Upcoming);
    assert!(remote.server_event(&created.id).is_some());
}

#[tokio::test]
async fn failed_create_leaves_mirror_untouched() {
    let remote = MockRemoteService::new();
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    remote.fail_next(RemoteError::Api {
        status: 422,
        message: "Validation failed".to_string(),
    });

    assert!(store.create_event(draft("Rejected")).await.is_none());
    assert!(store.events().await.is_empty());
    assert!(store.event_by_id(&EventId::from("evt-1")).await.is_none());
}

#[tokio::test]
async fn update_event_replaces_the_mirrored_record() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 3));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let id = EventId::from("e1");
    let patch = campus_events_store::EventPatch {
        title: Some("Renamed".to_string()),
        approved: Some(false),
        ..Default::default()
    };

    let updated = store.update_event(&id, patch).await.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert!(!updated.approved);
    assert_eq!(store.event_by_id(&id).await.unwrap(), updated);
}

#[tokio::test]
async fn failed_update_leaves_the_prior_record_intact() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 3));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let id = EventId::from("e1");
    let before = store.event_by_id(&id).await.unwrap();

    remote.fail_next(RemoteError::Transport("reset by peer".to_string()));
    let patch = campus_events_store::EventPatch {
        title: Some("Never applied".to_string()),
        ..Default::default()
    };

    assert!(store.update_event(&id, patch).await.is_none());
    assert_eq!(store.event_by_id(&id).await.unwrap(), before);
}

#[tokio::test]
async fn delete_event_reports_boolean_outcome() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let id = EventId::from("e1");
    assert!(store.delete_event(&id).await);
    assert!(store.event_by_id(&id).await.is_none());

    // Second delete is rejected server-side; the mirror is untouched.
    assert!(!store.delete_event(&id).await);
}

#[tokio::test]
async fn capacity_scenario_mirrors_the_server_exactly() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 2, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let event = EventId::from("e1");
    let alice = ParticipantId::from("alice");
    let bob = ParticipantId::from("bob");
    let carol = ParticipantId::from("carol");

    store.register_for_event(&event, &alice).await.unwrap();
    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 1);

    store.register_for_event(&event, &bob).await.unwrap();
    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 2);

    // Carol is rejected server-side: no record, no counter change.
    let rejection = store.register_for_event(&event, &carol).await.unwrap_err();
    assert!(rejection.is_rejection());
    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 2);
    assert!(store.registrations_for_participant(&carol).await.is_empty());

    // Alice cancels: her record is retained, flipped to cancelled.
    store.cancel_registration(&event, &alice).await.unwrap();
    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 1);

    let alice_records = store.registrations_for_participant(&alice).await;
    assert_eq!(alice_records.len(), 1);
    assert_eq!(alice_records[0].status, RegistrationStatus::Cancelled);
}

#[tokio::test]
async fn register_then_cancel_round_trips_the_counter() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 7));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let event = EventId::from("e1");
    let dana = ParticipantId::from("dana");

    store.register_for_event(&event, &dana).await.unwrap();
    store.cancel_registration(&event, &dana).await.unwrap();

    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 7);
}

#[tokio::test]
async fn redundant_cancel_is_rejected_without_local_mutation() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let event = EventId::from("e1");
    let dana = ParticipantId::from("dana");

    store.register_for_event(&event, &dana).await.unwrap();
    store.cancel_registration(&event, &dana).await.unwrap();
    assert!(store.cancel_registration(&event, &dana).await.is_err());

    assert_eq!(store.event_by_id(&event).await.unwrap().registered_count, 0);
    assert_eq!(store.registrations_for_participant(&dana).await.len(), 1);
}

#[tokio::test]
async fn attendance_and_certificate_flags_update_in_place() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let event = EventId::from("e1");
    let alice = ParticipantId::from("alice");
    store.register_for_event(&event, &alice).await.unwrap();

    store.mark_attendance(&event, &alice, true).await.unwrap();
    store.mark_certificate_paid(&event, &alice, true).await.unwrap();

    let records = store.registrations_for_participant(&alice).await;
    assert!(records[0].attended);
    assert!(records[0].certificate_paid);

    // Flags can be cleared again.
    store.mark_attendance(&event, &alice, false).await.unwrap();
    let records = store.registrations_for_participant(&alice).await;
    assert!(!records[0].attended);
}

#[tokio::test]
async fn flag_update_for_unknown_pair_propagates_the_rejection() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let outcome = store
        .mark_attendance(&EventId::from("e1"), &ParticipantId::from("ghost"), true)
        .await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn feedback_is_forwarded_verbatim_without_touching_the_mirror() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let mirror_before = store.events().await;

    let created = store
        .submit_feedback(NewFeedback {
            event_id: EventId::from("e1"),
            participant_id: ParticipantId::from("alice"),
            rating: 5,
            comments: Some("Great session".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(created.rating, 5);
    assert_eq!(store.events().await, mirror_before);

    let listed = store.feedback_for_event(&EventId::from("e1")).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn rating_queries_default_on_failure() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let event = EventId::from("e1");
    for (participant, rating) in [("alice", 4), ("bob", 2)] {
        store
            .submit_feedback(NewFeedback {
                event_id: event.clone(),
                participant_id: ParticipantId::from(participant),
                rating,
                comments: None,
            })
            .await
            .unwrap();
    }

    let summary = store.average_rating(&event).await;
    assert_eq!(summary.count, 2);
    assert!((summary.average_rating - 3.0).abs() < f64::EPSILON);

    remote.fail_next(RemoteError::Transport("down".to_string()));
    assert_eq!(store.average_rating(&event).await, RatingSummary::default());

    remote.fail_next(RemoteError::Transport("down".to_string()));
    assert!(store.feedback_for_event(&event).await.is_empty());
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_and_returns_none() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 50, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    let outcome = store
        .submit_feedback(NewFeedback {
            event_id: EventId::from("e1"),
            participant_id: ParticipantId::from("alice"),
            rating: 6,
            comments: None,
        })
        .await;
    assert!(outcome.is_none());
}

#[tokio::test]
async fn reload_replaces_the_mirror_wholesale() {
    let remote = MockRemoteService::new();
    remote.seed_event(seeded_event("e1", 10, 0));
    let clock = FixedClock::at(morning());
    let store = connect(&remote, &clock).await;

    assert_eq!(store.events().await.len(), 1);

    // The backend changes behind the mirror's back.
    remote.seed_event(seeded_event("e2", 10, 0));
    remote.seed_event(seeded_event("e3", 10, 0));

    store.reload().await;
    assert_eq!(store.events().await.len(), 3);
}
