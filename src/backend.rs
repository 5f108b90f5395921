use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    entitlements::Entitlements,
    error::BackendError,
    models::User,
    permissions::AuthorizationRequest,
    session::PermissionSet,
};

/// Header carrying the service token on calls to the platform API.
pub const SESSION_TOKEN_HEADER: &str = "Coder-Session-Token";

/// ConsoleBackend Trait
///
/// The typed request/response contract with the platform API. The console
/// never talks to the platform any other way, so tests and local runs can
/// swap in [`StaticBackend`].
#[async_trait]
pub trait ConsoleBackend: Send + Sync {
    /// Looks a user up by id. `Ok(None)` means the platform does not know the user.
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, BackendError>;

    /// Evaluates the given checks for `user`, one boolean per check name.
    async fn check_permissions(
        &self,
        user: &User,
        request: &AuthorizationRequest,
    ) -> Result<PermissionSet, BackendError>;

    /// The deployment's current entitlements.
    async fn entitlements(&self) -> Result<Entitlements, BackendError>;
}

/// BackendState
///
/// The shared handle to the backend used across the application state.
pub type BackendState = Arc<dyn ConsoleBackend>;

// --- HTTP implementation ---

/// HttpBackend
///
/// Talks to the platform's REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint));
        match &self.token {
            Some(token) => builder.header(SESSION_TOKEN_HEADER, token),
            None => builder,
        }
    }
}

fn status_error(endpoint: &str, status: StatusCode) -> BackendError {
    BackendError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
    }
}

#[async_trait]
impl ConsoleBackend for HttpBackend {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, BackendError> {
        let endpoint = format!("/api/v2/users/{id}");
        let response = self.request(reqwest::Method::GET, &endpoint).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<User>().await?)),
            status => Err(status_error(&endpoint, status)),
        }
    }

    async fn check_permissions(
        &self,
        user: &User,
        request: &AuthorizationRequest,
    ) -> Result<PermissionSet, BackendError> {
        let endpoint = format!("/api/v2/users/{}/authorization", user.id);
        let response = self
            .request(reqwest::Method::POST, &endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(&endpoint, response.status()));
        }
        let answers = response.json::<BTreeMap<String, bool>>().await?;

        // Checks the backend left out read as denied.
        Ok(request
            .names()
            .map(|name| (name, answers.get(name).copied().unwrap_or(false)))
            .collect())
    }

    async fn entitlements(&self) -> Result<Entitlements, BackendError> {
        let endpoint = "/api/v2/entitlements";
        let response = self.request(reqwest::Method::GET, endpoint).send().await?;

        if !response.status().is_success() {
            return Err(status_error(endpoint, response.status()));
        }
        Ok(response.json::<Entitlements>().await?)
    }
}

// --- In-memory implementation (local runs and tests) ---

/// StaticBackend
///
/// A backend whose users, grants and entitlements are set up front. Unknown
/// checks are denied. Setting it unavailable makes every call fail.
#[derive(Default)]
pub struct StaticBackend {
    users: RwLock<HashMap<Uuid, User>>,
    grants: RwLock<HashMap<Uuid, PermissionSet>>,
    entitlements: RwLock<Entitlements>,
    unavailable: RwLock<bool>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User, grants: PermissionSet) -> Self {
        self.put_user(user, grants);
        self
    }

    pub fn with_entitlements(self, entitlements: Entitlements) -> Self {
        self.set_entitlements(entitlements);
        self
    }

    pub fn put_user(&self, user: User, grants: PermissionSet) {
        if let Ok(mut g) = self.grants.write() {
            g.insert(user.id, grants);
        }
        if let Ok(mut users) = self.users.write() {
            users.insert(user.id, user);
        }
    }

    pub fn set_entitlements(&self, entitlements: Entitlements) {
        if let Ok(mut e) = self.entitlements.write() {
            *e = entitlements;
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut u) = self.unavailable.write() {
            *u = unavailable;
        }
    }

    fn ensure_available(&self) -> Result<(), BackendError> {
        match self.unavailable.read() {
            Ok(u) if !*u => Ok(()),
            _ => Err(BackendError::Unavailable("static backend switched off".to_string())),
        }
    }
}

#[async_trait]
impl ConsoleBackend for StaticBackend {
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, BackendError> {
        self.ensure_available()?;
        let users = self
            .users
            .read()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(users.get(&id).cloned())
    }

    async fn check_permissions(
        &self,
        user: &User,
        request: &AuthorizationRequest,
    ) -> Result<PermissionSet, BackendError> {
        self.ensure_available()?;
        let grants = self
            .grants
            .read()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        let granted = grants.get(&user.id);
        Ok(request
            .names()
            .map(|name| (name, granted.is_some_and(|g| g.allows(name))))
            .collect())
    }

    async fn entitlements(&self) -> Result<Entitlements, BackendError> {
        self.ensure_available()?;
        self.entitlements
            .read()
            .map(|e| e.clone())
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}
