use crate::{
    entitlements::{Entitlements, FeatureName, FeatureVisibilityMap, feature_visibility},
    models::User,
    permissions,
    session::{PermissionSet, SessionState},
};

/// StoreEvent
///
/// Everything that may change the client state. Nothing else writes to the store.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionLoading,
    SignedIn {
        user: User,
        permissions: PermissionSet,
    },
    SignedOut,
    PermissionsRefreshed(PermissionSet),
    EntitlementsRefreshed(Entitlements),
}

/// ClientStateStore
///
/// Single writer of the session state and the feature visibility map. Guards
/// and pages never see the store itself, only a [`StoreSnapshot`] taken from it.
#[derive(Debug, Clone)]
pub struct ClientStateStore {
    session: SessionState,
    entitlements: Entitlements,
    visibility: FeatureVisibilityMap,
    version: u64,
}

impl Default for ClientStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientStateStore {
    /// A fresh store knows nothing yet: the session is loading and no feature is visible.
    pub fn new() -> Self {
        Self {
            session: SessionState::loading(),
            entitlements: Entitlements::default(),
            visibility: FeatureVisibilityMap::default(),
            version: 0,
        }
    }

    /// dispatch
    ///
    /// Applies one event. The version is bumped for every applied event so that
    /// hosts can tell a stale render from a fresh one.
    pub fn dispatch(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::SessionLoading => {
                self.session = SessionState::loading();
            }
            StoreEvent::SignedIn { user, permissions } => {
                tracing::debug!(user = %user.username, "session signed in");
                self.session = SessionState::authenticated(user, permissions);
            }
            StoreEvent::SignedOut => {
                tracing::debug!("session signed out");
                self.session = SessionState::unauthenticated();
            }
            StoreEvent::PermissionsRefreshed(permissions) => {
                if !self.session.is_authenticated() {
                    tracing::warn!("ignoring permission refresh without a signed-in session");
                    return;
                }
                self.session.replace_permissions(permissions);
            }
            StoreEvent::EntitlementsRefreshed(entitlements) => {
                self.visibility = feature_visibility(&entitlements);
                self.entitlements = entitlements;
            }
        }
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    // --- Selectors ---

    pub fn select_session(&self) -> &SessionState {
        &self.session
    }

    pub fn select_permissions(&self) -> &PermissionSet {
        self.session.permissions()
    }

    pub fn select_feature_visibility(&self) -> &FeatureVisibilityMap {
        &self.visibility
    }

    pub fn select_entitlements(&self) -> &Entitlements {
        &self.entitlements
    }

    /// Takes the immutable context one resolution runs against.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            session: self.session.clone(),
            feature_visibility: self.visibility.clone(),
            version: self.version,
        }
    }
}

/// StoreSnapshot
///
/// The explicit context threaded through guard evaluation and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub session: SessionState,
    pub feature_visibility: FeatureVisibilityMap,
    pub version: u64,
}

impl StoreSnapshot {
    pub fn permissions(&self) -> &PermissionSet {
        self.session.permissions()
    }
}

// --- Visibility selectors used by permission guards and the frame ---

/// The audit log needs both the licensed feature and the per-user permission.
pub fn audit_log_visible(snapshot: &StoreSnapshot) -> bool {
    snapshot.feature_visibility.is_visible(FeatureName::AuditLog)
        && snapshot.permissions().allows(permissions::VIEW_AUDIT_LOG)
}

pub fn users_visible(snapshot: &StoreSnapshot) -> bool {
    snapshot.permissions().allows(permissions::READ_ALL_USERS)
}
