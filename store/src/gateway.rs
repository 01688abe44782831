//! HTTP gateway to the Remote Data Service.
//!
//! [`HttpRemoteService`] implements [`RemoteDataService`] over reqwest.
//! Event create/update switches to a multipart form when an image is
//! attached; everything else is JSON. A shared [`TokenCell`] injects the
//! bearer token into every request, so the auth collaborator can publish
//! a token once and every subsequent call carries it.

use crate::error::{RemoteError, Result};
use crate::model::{
    AttendanceUpdate, CertificateUpdate, Event, EventDraft, EventId, EventPatch, Feedback,
    ImageAttachment, NewFeedback, RatingSummary, Registration, RegistrationRequest,
};
use crate::providers::RemoteDataService;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Shared bearer-token slot.
///
/// One cell is shared between the gateway (which reads it on every
/// request) and the auth session (which writes it on login/logout). The
/// gateway itself never manages the token's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a token.
    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(token.into());
        }
    }

    /// Clear the token.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }

    /// The current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the Remote Data Service, e.g.
    /// `http://localhost:5000/api`.
    pub base_url: String,
}

impl GatewayConfig {
    /// Environment variable overriding the base URL.
    pub const BASE_URL_VAR: &'static str = "CAMPUS_EVENTS_API_URL";

    /// Create a configuration with an explicit base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the configuration from the environment, falling back to the
    /// default local backend.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(Self::BASE_URL_VAR) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
        }
    }
}

/// Remote Data Service client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteService {
    client: Client,
    config: GatewayConfig,
    token: TokenCell,
}

impl HttpRemoteService {
    /// Create a new gateway with its own token cell.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token: TokenCell::new(),
        }
    }

    /// Use a shared token cell (typically the auth session's).
    #[must_use]
    pub fn with_token(mut self, token: TokenCell) -> Self {
        self.token = token;
        self
    }

    /// Handle to the gateway's token cell.
    #[must_use]
    pub fn token(&self) -> TokenCell {
        self.token.clone()
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.config.base_url));
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// Event create/update body: multipart when an image rides along,
    /// JSON otherwise.
    async fn send_event_payload<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        image: Option<&ImageAttachment>,
    ) -> Result<Event> {
        let builder = self.request(method, path);
        let builder = match image {
            Some(image) => builder.multipart(multipart_form(body, image)?),
            None => builder.json(body),
        };
        let response = builder.send().await.map_err(transport)?;
        decode(response).await
    }
}

impl RemoteDataService for HttpRemoteService {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send {
        self.get_json("/events")
    }

    fn create_event(&self, draft: &EventDraft) -> impl Future<Output = Result<Event>> + Send {
        self.send_event_payload(Method::POST, "/events", draft, draft.image.as_ref())
    }

    fn update_event(
        &self,
        id: &EventId,
        patch: &EventPatch,
    ) -> impl Future<Output = Result<Event>> + Send {
        async move {
            self.send_event_payload(
                Method::PUT,
                &format!("/events/{id}"),
                patch,
                patch.image.as_ref(),
            )
            .await
        }
    }

    fn delete_event(&self, id: &EventId) -> impl Future<Output = Result<()>> + Send {
        async move {
            let response = self
                .request(Method::DELETE, &format!("/events/{id}"))
                .send()
                .await
                .map_err(transport)?;
            check(response).await
        }
    }

    fn list_registrations(&self) -> impl Future<Output = Result<Vec<Registration>>> + Send {
        self.get_json("/registrations")
    }

    fn create_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<Registration>> + Send {
        self.post_json("/registrations", request)
    }

    fn cancel_registration(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            let response = self
                .request(Method::POST, "/registrations/cancel")
                .json(request)
                .send()
                .await
                .map_err(transport)?;
            check(response).await
        }
    }

    fn set_attendance(&self, update: &AttendanceUpdate) -> impl Future<Output = Result<()>> + Send {
        async move {
            let response = self
                .request(Method::POST, "/registrations/attendance")
                .json(update)
                .send()
                .await
                .map_err(transport)?;
            check(response).await
        }
    }

    fn set_certificate_paid(
        &self,
        update: &CertificateUpdate,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            let response = self
                .request(Method::POST, "/registrations/certificate")
                .json(update)
                .send()
                .await
                .map_err(transport)?;
            check(response).await
        }
    }

    fn submit_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> impl Future<Output = Result<Feedback>> + Send {
        self.post_json("/feedback", feedback)
    }

    fn feedback_for_event(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<Feedback>>> + Send {
        async move { self.get_json(&format!("/feedback/{event_id}")).await }
    }

    fn average_rating(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<RatingSummary>> + Send {
        async move { self.get_json(&format!("/feedback/{event_id}/average")).await }
    }
}

pub(crate) fn transport(error: reqwest::Error) -> RemoteError {
    RemoteError::Transport(error.to_string())
}

/// Decode a JSON response, mapping non-success statuses to
/// [`RemoteError::Api`] with the body carried verbatim.
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Like [`decode`], for endpoints whose body is irrelevant.
pub(crate) async fn check(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = response.text().await.unwrap_or_default();
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Flatten a serializable payload into multipart text fields and attach
/// the image part. Nested values (tag arrays) are sent as JSON text.
fn multipart_form<B: Serialize + ?Sized>(body: &B, image: &ImageAttachment) -> Result<Form> {
    let value = serde_json::to_value(body).map_err(|e| RemoteError::Payload(e.to_string()))?;

    let mut form = Form::new();
    if let serde_json::Value::Object(fields) = value {
        for (key, field) in fields {
            let text = match field {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(key, text);
        }
    }

    let part = Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| RemoteError::Payload(e.to_string()))?;

    Ok(form.part("image", part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cell_round_trip() {
        let cell = TokenCell::new();
        assert_eq!(cell.get(), None);

        cell.set("jwt-abc");
        assert_eq!(cell.get(), Some("jwt-abc".to_string()));

        cell.clear();
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn token_cell_is_shared_between_clones() {
        let cell = TokenCell::new();
        let other = cell.clone();

        cell.set("jwt-abc");
        assert_eq!(other.get(), Some("jwt-abc".to_string()));
    }

    #[test]
    fn config_defaults_to_local_backend() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
    }
}
