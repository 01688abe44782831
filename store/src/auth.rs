//! Authentication collaborator.
//!
//! A thin client for the backend's login/register exchange. On success it
//! caches the current [`User`] and publishes the bearer token into the
//! shared [`TokenCell`] so the gateway attaches it to every subsequent
//! request. The session stores nothing durably; it lives and dies with
//! the client session, like the catalog mirror.

use crate::gateway::{decode, transport, GatewayConfig, TokenCell};
use crate::model::ParticipantId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Unauthenticated browsing.
    Visitor,
    /// Registers for events, submits feedback.
    Participant,
    /// Creates and manages events.
    Organizer,
    /// Approves events, manages everything.
    Admin,
}

impl UserRole {
    /// Get the role name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Participant => "participant",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

/// An authenticated user, as returned by the login/register exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identity.
    pub id: ParticipantId,

    /// Email address.
    pub email: String,

    /// Role.
    pub role: UserRole,

    /// Display name.
    pub full_name: String,

    /// Department, for students and organizers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Enrollment number, for students.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_no: Option<String>,

    /// Mobile number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// Bearer token for subsequent requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Registration payload for a new account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfile {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Requested role.
    pub role: UserRole,
    /// Department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Enrollment number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_no: Option<String>,
    /// Mobile number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

/// Session-scoped authentication state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    client: Client,
    base_url: String,
    token: TokenCell,
    user: Arc<RwLock<Option<User>>>,
}

impl AuthSession {
    /// Create a session publishing tokens into the given cell.
    #[must_use]
    pub fn new(config: &GatewayConfig, token: TokenCell) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            token,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Log in. On success the user is cached and the token published;
    /// on failure the session is left unchanged and `false` returned.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.exchange("/users/login", credentials).await
    }

    /// Register a new account. Same outcome contract as [`login`].
    ///
    /// [`login`]: AuthSession::login
    pub async fn register(&self, profile: &RegisterProfile) -> bool {
        self.exchange("/users/register", profile).await
    }

    /// Clear the cached user and the published token.
    pub fn logout(&self) {
        if let Ok(mut guard) = self.user.write() {
            *guard = None;
        }
        self.token.clear();
    }

    /// The currently authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.user.read().ok().and_then(|guard| guard.clone())
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Whether the current user holds one of the given roles.
    #[must_use]
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        self.current_user()
            .is_some_and(|user| roles.contains(&user.role))
    }

    async fn exchange<B: Serialize + Sync>(&self, path: &str, body: &B) -> bool {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(transport);

        let user: User = match response {
            Ok(response) => match decode(response).await {
                Ok(user) => user,
                Err(error) => {
                    tracing::warn!(%error, path, "Authentication exchange rejected");
                    return false;
                },
            },
            Err(error) => {
                tracing::warn!(%error, path, "Authentication exchange failed");
                return false;
            },
        };

        if let Some(token) = &user.token {
            self.token.set(token.clone());
        }
        if let Ok(mut guard) = self.user.write() {
            *guard = Some(user);
        }
        true
    }
}
