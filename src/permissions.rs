//! The permission checks the console asks the backend to evaluate for the
//! signed-in user. Each check names an RBAC object type and an action; the
//! backend answers with one boolean per check name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

pub const READ_ALL_USERS: &str = "readAllUsers";
pub const UPDATE_USERS: &str = "updateUsers";
pub const CREATE_USER: &str = "createUser";
pub const CREATE_TEMPLATES: &str = "createTemplates";
pub const DELETE_TEMPLATES: &str = "deleteTemplates";
pub const VIEW_AUDIT_LOG: &str = "viewAuditLog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// RbacObject
///
/// The object a check is about. Leaving `owner_id` and `organization_id` empty
/// asks about every object of the type ("can read all users").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RbacObject {
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
}

impl RbacObject {
    pub fn of_type(resource_type: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            owner_id: None,
            organization_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthorizationCheck {
    pub object: RbacObject,
    pub action: Action,
}

/// AuthorizationRequest
///
/// Body of `POST /api/v2/users/{id}/authorization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthorizationRequest {
    pub checks: BTreeMap<String, AuthorizationCheck>,
}

impl AuthorizationRequest {
    pub fn with_check(mut self, name: &str, resource_type: &str, action: Action) -> Self {
        self.checks.insert(
            name.to_string(),
            AuthorizationCheck {
                object: RbacObject::of_type(resource_type),
                action,
            },
        );
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

/// console_checks
///
/// Every check the console needs to decide what to show.
pub fn console_checks() -> AuthorizationRequest {
    AuthorizationRequest::default()
        .with_check(READ_ALL_USERS, "user", Action::Read)
        .with_check(UPDATE_USERS, "user", Action::Update)
        .with_check(CREATE_USER, "user", Action::Create)
        .with_check(CREATE_TEMPLATES, "template", Action::Update)
        .with_check(DELETE_TEMPLATES, "template", Action::Delete)
        .with_check(VIEW_AUDIT_LOG, "audit_log", Action::Read)
}
