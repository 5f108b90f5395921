use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    backend::BackendState,
    config::{AppConfig, Env},
    entitlements::Entitlements,
    permissions::console_checks,
    store::{ClientStateStore, StoreEvent},
};

/// Cookie the platform stores the session token in.
pub const SESSION_COOKIE: &str = "coder_session_token";
/// Local-only header naming the user to act as.
pub const BYPASS_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload of a console session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id, looked up through the backend on every request.
    pub sub: Uuid,
    /// Expiration Time (exp): tokens past it are rejected.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// Viewer
///
/// Who is behind a request, expressed as the store event that establishes
/// their session. The extractor never rejects: an anonymous request is a
/// signed-out viewer, and the route guards decide what that means.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub event: StoreEvent,
}

impl Viewer {
    /// into_store
    ///
    /// Builds the request's own store: entitlements first, then the session.
    pub fn into_store(self, entitlements: Option<Entitlements>) -> ClientStateStore {
        let mut store = ClientStateStore::new();
        if let Some(entitlements) = entitlements {
            store.dispatch(StoreEvent::EntitlementsRefreshed(entitlements));
        }
        store.dispatch(self.event);
        store
    }
}

/// Viewer Extractor Implementation
///
/// 1. Identify: local `x-user-id` bypass (`Env::Local` only), otherwise a JWT
///    from the `Authorization: Bearer` header or the session cookie.
/// 2. Look the user up through the backend; unknown or suspended users are signed out.
/// 3. Ask the backend for the console's permission checks.
///
/// A backend failure in steps 2 or 3 leaves the session loading, so guards
/// defer instead of bouncing a valid user to the login page.
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    BackendState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let backend = BackendState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let Some(user_id) = identify(&parts.headers, &config) else {
            return Ok(Viewer {
                event: StoreEvent::SignedOut,
            });
        };

        let user = match backend.user_by_id(user_id).await {
            Ok(Some(user)) if user.is_active() => user,
            Ok(Some(user)) => {
                tracing::debug!(user = %user.username, "suspended user treated as signed out");
                return Ok(Viewer {
                    event: StoreEvent::SignedOut,
                });
            }
            Ok(None) => {
                tracing::debug!(%user_id, "token subject unknown to the backend");
                return Ok(Viewer {
                    event: StoreEvent::SignedOut,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "user lookup failed, session left loading");
                return Ok(Viewer {
                    event: StoreEvent::SessionLoading,
                });
            }
        };

        let event = match backend.check_permissions(&user, &console_checks()).await {
            Ok(permissions) => StoreEvent::SignedIn { user, permissions },
            Err(e) => {
                tracing::warn!(error = %e, "permission check failed, session left loading");
                StoreEvent::SessionLoading
            }
        };
        Ok(Viewer { event })
    }
}

/// identify
///
/// Resolves the user id a request claims, without asking the backend.
pub fn identify(headers: &HeaderMap, config: &AppConfig) -> Option<Uuid> {
    if config.env == Env::Local {
        let bypass = headers
            .get(BYPASS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|id| Uuid::parse_str(id).ok());
        if bypass.is_some() {
            return bypass;
        }
    }

    let token = bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })?;

    decode_token(&token, &config.jwt_secret)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Validates the token signature and expiry and returns its subject.
pub fn decode_token(token: &str, secret: &str) -> Option<Uuid> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Some(data.claims.sub),
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                _ => tracing::debug!(error = %e, "session token rejected"),
            }
            None
        }
    }
}
