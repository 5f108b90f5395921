use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::session::AuthStatus;

// --- Platform Schemas (as returned by the backend API) ---

/// User
///
/// The signed-in account as the platform API describes it. Only the fields the
/// console needs to drive its guards and chrome are kept.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// UserStatus
///
/// Suspended accounts keep their profile but may not hold a console session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct Role {
    pub name: String,
    pub display_name: String,
}

// --- Console Schemas (served by this crate) ---

/// RouteQuery
///
/// Query string of `GET /api/console/route`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteQuery {
    /// The console path to resolve, including its query string if any.
    pub path: String,
}

/// RouteDecision
///
/// What the console would do for a path, given the caller's session. The
/// front end uses it to mirror the server's routing without re-implementing
/// the guards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum RouteDecision {
    /// The route rendered. `page` is `None` when a permission guard hid the content.
    Render {
        page: Option<String>,
        pattern: String,
        params: BTreeMap<String, String>,
        framed: bool,
        status: u16,
    },
    /// A guard or a redirect element sent the viewer elsewhere.
    Redirect { to: String },
    /// The session is still loading; ask again shortly.
    Deferred,
}

/// SessionSnapshotResponse
///
/// The state the guards see for the caller: what `GET /api/console/session` returns.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct SessionSnapshotResponse {
    pub status: AuthStatus,
    pub user: Option<User>,
    pub permissions: BTreeMap<String, bool>,
    pub feature_visibility: BTreeMap<String, bool>,
}
