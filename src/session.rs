use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::User;

/// AuthStatus
///
/// `Loading` is the indeterminate state between startup (or a backend hiccup)
/// and a definite answer; guards defer instead of redirecting while in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AuthStatus {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// PermissionSet
///
/// Result of the backend's permission checks, keyed by check name
/// (see [`crate::permissions`]). A name that was never checked reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, bool>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, allowed: bool) {
        self.0.insert(name.into(), allowed);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.0
    }
}

impl From<BTreeMap<String, bool>> for PermissionSet {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// SessionState
///
/// Who is looking at the console. Only [`crate::store::ClientStateStore`]
/// builds values of this type for a live session; everybody else reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    status: AuthStatus,
    user: Option<User>,
    permissions: PermissionSet,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            status: AuthStatus::Loading,
            user: None,
            permissions: PermissionSet::new(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            user: None,
            permissions: PermissionSet::new(),
        }
    }

    pub fn authenticated(user: User, permissions: PermissionSet) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            user: Some(user),
            permissions,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub(crate) fn replace_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = permissions;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
