//! Mock Remote Data Service for testing.
//!
//! In-memory stand-in for the backend, enforcing the same business rules
//! the real service owns (capacity, duplicate registrations, rating
//! bounds) so facade tests exercise realistic rejections. Supports
//! one-shot failure injection via [`MockRemoteService::fail_next`].

use crate::error::{RemoteError, Result};
use crate::model::{
    AttendanceUpdate, CertificateUpdate, Event, EventDraft, EventId, EventPatch, EventStatus,
    Feedback, FeedbackAuthor, FeedbackId, NewFeedback, RatingSummary, Registration,
    RegistrationId, RegistrationRequest, RegistrationStatus,
};
use crate::providers::RemoteDataService;
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    events: Vec<Event>,
    registrations: Vec<Registration>,
    feedback: Vec<Feedback>,
    next_id: u64,
    fail_next: Option<RemoteError>,
    call_log: Vec<&'static str>,
}

/// Mock Remote Data Service.
///
/// Uses in-memory storage; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRemoteService {
    inner: Arc<Mutex<MockState>>,
}

impl MockRemoteService {
    /// Create an empty mock service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an event into the backend.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[allow(clippy::unwrap_used)] // test seam
    pub fn seed_event(&self, event: Event) {
        self.inner.lock().unwrap().events.push(event);
    }

    /// Seed a registration into the backend.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[allow(clippy::unwrap_used)] // test seam
    pub fn seed_registration(&self, registration: Registration) {
        self.inner.lock().unwrap().registrations.push(registration);
    }

    /// Make the next remote call fail with the given error.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[allow(clippy::unwrap_used)] // test seam
    pub fn fail_next(&self, error: RemoteError) {
        self.inner.lock().unwrap().fail_next = Some(error);
    }

    /// How many times an operation was invoked.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)] // test seam
    pub fn call_count(&self, op: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|name| **name == op)
            .count()
    }

    /// The server-side view of an event, for asserting backend state.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)] // test seam
    pub fn server_event(&self, id: &EventId) -> Option<Event> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == *id)
            .cloned()
    }

    fn with_state<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut MockState) -> Result<T>,
    ) -> Result<T> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| RemoteError::Transport("mock state lock poisoned".to_string()))?;
        state.call_log.push(op);
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        f(&mut state)
    }

    fn assign_id(state: &mut MockState, prefix: &str) -> String {
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }
}

fn rejected(status: u16, message: &str) -> RemoteError {
    RemoteError::Api {
        status,
        message: message.to_string(),
    }
}

impl RemoteDataService for MockRemoteService {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let result = self.with_state("list_events", |state| Ok(state.events.clone()));
        async move { result }
    }

    fn create_event(&self, draft: &EventDraft) -> impl Future<Output = Result<Event>> + Send {
        let result = self.with_state("create_event", |state| {
            let id = Self::assign_id(state, "evt");
            let now = Utc::now();
            let event = Event {
                id: EventId::new(id),
                title: draft.title.clone(),
                description: draft.description.clone(),
                category: draft.category,
                starts_at: draft.starts_at,
                ends_at: draft.ends_at,
                venue: draft.venue.clone(),
                organizer_id: draft.organizer_id.clone(),
                organizer_name: draft.organizer_name.clone(),
                department: draft.department.clone(),
                max_participants: draft.max_participants,
                registered_count: 0,
                status: EventStatus::default(),
                approved: false,
                image_url: draft
                    .image
                    .as_ref()
                    .map(|image| format!("/uploads/{}", image.file_name)),
                certificate_fee: draft.certificate_fee,
                tags: draft.tags.clone(),
                created_at: Some(now),
                updated_at: Some(now),
            };
            state.events.push(event.clone());
            Ok(event)
        });
        async move { result }
    }

    fn update_event(
        &self,
        id: &EventId,
        patch: &EventPatch,
    ) -> impl Future<Output = Result<Event>> + Send {
        let result = self.with_state("update_event", |state| {
            let Some(event) = state.events.iter_mut().find(|e| e.id == *id) else {
                return Err(rejected(404, "Event not found"));
            };

            if let Some(title) = &patch.title {
                event.title = title.clone();
            }
            if let Some(description) = &patch.description {
                event.description = description.clone();
            }
            if let Some(category) = patch.category {
                event.category = category;
            }
            if let Some(starts_at) = patch.starts_at {
                event.starts_at = starts_at;
            }
            if let Some(ends_at) = patch.ends_at {
                event.ends_at = ends_at;
            }
            if let Some(venue) = &patch.venue {
                event.venue = venue.clone();
            }
            if let Some(department) = &patch.department {
                event.department = department.clone();
            }
            if let Some(max_participants) = patch.max_participants {
                event.max_participants = max_participants;
            }
            if let Some(certificate_fee) = patch.certificate_fee {
                event.certificate_fee = Some(certificate_fee);
            }
            if let Some(tags) = &patch.tags {
                event.tags = tags.clone();
            }
            if let Some(approved) = patch.approved {
                event.approved = approved;
            }
            if let Some(image) = &patch.image {
                event.image_url = Some(format!("/uploads/{}", image.file_name));
            }
            event.updated_at = Some(Utc::now());

            Ok(event.clone())
        });
        async move { result }
    }

    fn delete_event(&self, id: &EventId) -> impl Future<Output = Result<()>> + Send {
        let result = self.with_state("delete_event", |state| {
            let before = state.events.len();
            state.events.retain(|e| e.id != *id);
            if state.events.len() == before {
                return Err(rejected(404, "Event not found"));
            }
            Ok(())
        });
        async move { result }
    }

    fn list_registrations(&self) -> impl Future<Output = Result<Vec<Registration>>> + Send {
        let result = self.with_state("list_registrations", |state| Ok(state.registrations.clone()));
        async move { result }
    }

    fn create_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<Registration>> + Send {
        let result = self.with_state("create_registration", |state| {
            let already_active = state
                .registrations
                .iter()
                .any(|r| r.is_active_for(&request.event_id, &request.participant_id));
            if already_active {
                return Err(rejected(409, "Already registered"));
            }

            let Some(event) = state.events.iter_mut().find(|e| e.id == request.event_id) else {
                return Err(rejected(404, "Event not found"));
            };
            if event.is_full() {
                return Err(rejected(400, "Event is full"));
            }
            event.registered_count += 1;

            let now = Utc::now();
            let id = {
                state.next_id += 1;
                format!("reg-{}", state.next_id)
            };
            let registration = Registration {
                id: RegistrationId::new(id),
                event_id: request.event_id.clone(),
                participant_id: request.participant_id.clone(),
                status: RegistrationStatus::Registered,
                attended: false,
                certificate_paid: false,
                created_at: Some(now),
                updated_at: Some(now),
            };
            state.registrations.push(registration.clone());
            Ok(registration)
        });
        async move { result }
    }

    fn cancel_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.with_state("cancel_registration", |state| {
            let Some(registration) = state
                .registrations
                .iter_mut()
                .find(|r| r.is_active_for(&request.event_id, &request.participant_id))
            else {
                return Err(rejected(404, "No active registration"));
            };
            registration.status = RegistrationStatus::Cancelled;
            registration.updated_at = Some(Utc::now());

            if let Some(event) = state.events.iter_mut().find(|e| e.id == request.event_id) {
                event.registered_count = event.registered_count.saturating_sub(1);
            }
            Ok(())
        });
        async move { result }
    }

    fn set_attendance(&self, update: &AttendanceUpdate) -> impl Future<Output = Result<()>> + Send {
        let result = self.with_state("set_attendance", |state| {
            let Some(registration) = state
                .registrations
                .iter_mut()
                .find(|r| r.matches(&update.event_id, &update.participant_id))
            else {
                return Err(rejected(404, "Registration not found"));
            };
            registration.attended = update.attended;
            registration.updated_at = Some(Utc::now());
            Ok(())
        });
        async move { result }
    }

    fn set_certificate_paid(
        &self,
        update: &CertificateUpdate,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.with_state("set_certificate_paid", |state| {
            let Some(registration) = state
                .registrations
                .iter_mut()
                .find(|r| r.matches(&update.event_id, &update.participant_id))
            else {
                return Err(rejected(404, "Registration not found"));
            };
            registration.certificate_paid = update.certificate_paid;
            registration.updated_at = Some(Utc::now());
            Ok(())
        });
        async move { result }
    }

    fn submit_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> impl Future<Output = Result<Feedback>> + Send {
        let result = self.with_state("submit_feedback", |state| {
            if !(1..=5).contains(&feedback.rating) {
                return Err(rejected(400, "Rating must be between 1 and 5"));
            }
            if !state.events.iter().any(|e| e.id == feedback.event_id) {
                return Err(rejected(404, "Event not found"));
            }

            let now = Utc::now();
            let id = Self::assign_id(state, "fb");
            let created = Feedback {
                id: FeedbackId::new(id),
                event_id: feedback.event_id.clone(),
                rating: feedback.rating,
                comments: feedback.comments.clone(),
                participant: FeedbackAuthor {
                    id: feedback.participant_id.clone(),
                    full_name: format!("Participant {}", feedback.participant_id),
                    email: format!("{}@example.edu", feedback.participant_id),
                },
                created_at: now,
                updated_at: now,
            };
            state.feedback.push(created.clone());
            Ok(created)
        });
        async move { result }
    }

    fn feedback_for_event(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<Feedback>>> + Send {
        let result = self.with_state("feedback_for_event", |state| {
            Ok(state
                .feedback
                .iter()
                .filter(|f| f.event_id == *event_id)
                .cloned()
                .collect())
        });
        async move { result }
    }

    fn average_rating(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<RatingSummary>> + Send {
        let result = self.with_state("average_rating", |state| {
            let ratings: Vec<f64> = state
                .feedback
                .iter()
                .filter(|f| f.event_id == *event_id)
                .map(|f| f64::from(f.rating))
                .collect();

            if ratings.is_empty() {
                return Ok(RatingSummary::default());
            }

            #[allow(clippy::cast_precision_loss)]
            let count = ratings.len() as f64;
            Ok(RatingSummary {
                average_rating: ratings.iter().sum::<f64>() / count,
                count: ratings.len() as u64,
            })
        });
        async move { result }
    }
}
