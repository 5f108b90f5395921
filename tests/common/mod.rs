#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use uuid::Uuid;
use workspace_console::{
    entitlements::{Entitlement, Entitlements, Feature, FeatureName},
    markup::Markup,
    models::{User, UserStatus},
    page::{RenderContext, Renderable},
    permissions,
    session::PermissionSet,
    store::{ClientStateStore, StoreEvent, StoreSnapshot},
};

pub const ALICE_ID: Uuid = Uuid::from_u128(1);

pub fn user(id: Uuid, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        status: UserStatus::Active,
        roles: vec![],
    }
}

pub fn alice() -> User {
    user(ALICE_ID, "alice")
}

pub fn grants(allowed: &[&str]) -> PermissionSet {
    allowed.iter().map(|name| (*name, true)).collect()
}

pub fn all_grants() -> PermissionSet {
    grants(&[
        permissions::READ_ALL_USERS,
        permissions::UPDATE_USERS,
        permissions::CREATE_USER,
        permissions::CREATE_TEMPLATES,
        permissions::DELETE_TEMPLATES,
        permissions::VIEW_AUDIT_LOG,
    ])
}

pub fn feature(entitlement: Entitlement, enabled: bool) -> Feature {
    Feature {
        entitlement,
        enabled,
        limit: None,
        actual: None,
    }
}

/// A licensed deployment with the given features entitled and enabled.
pub fn licensed(features: &[FeatureName]) -> Entitlements {
    Entitlements {
        features: features
            .iter()
            .map(|name| (name.as_str().to_string(), feature(Entitlement::Entitled, true)))
            .collect::<BTreeMap<_, _>>(),
        warnings: vec![],
        has_license: true,
    }
}

pub fn snapshot(entitlements: Option<Entitlements>, event: Option<StoreEvent>) -> StoreSnapshot {
    let mut store = ClientStateStore::new();
    if let Some(entitlements) = entitlements {
        store.dispatch(StoreEvent::EntitlementsRefreshed(entitlements));
    }
    if let Some(event) = event {
        store.dispatch(event);
    }
    store.snapshot()
}

pub fn loading() -> StoreSnapshot {
    snapshot(None, None)
}

pub fn signed_out() -> StoreSnapshot {
    snapshot(None, Some(StoreEvent::SignedOut))
}

pub fn signed_in(permissions: PermissionSet) -> StoreSnapshot {
    snapshot(
        None,
        Some(StoreEvent::SignedIn {
            user: alice(),
            permissions,
        }),
    )
}

/// Signed in with every permission on a deployment licensed for the audit log.
pub fn signed_in_with_audit() -> StoreSnapshot {
    snapshot(
        Some(licensed(&[FeatureName::AuditLog])),
        Some(StoreEvent::SignedIn {
            user: alice(),
            permissions: all_grants(),
        }),
    )
}

/// A page that counts how often it renders.
#[derive(Clone, Default)]
pub struct CountingPage {
    pub renders: Arc<AtomicUsize>,
}

impl CountingPage {
    pub fn count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl Renderable for CountingPage {
    fn render(&self, ctx: &RenderContext<'_>) -> Markup {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Markup::raw(format!("<counted page=\"{}\"></counted>", ctx.page.name()))
    }
}
