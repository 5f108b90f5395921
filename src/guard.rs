use std::fmt;

use crate::{
    navigation::{Navigator, login_redirect, retrieve_redirect},
    session::{AuthStatus, SessionState},
    store::StoreSnapshot,
};

/// GuardOutcome
///
/// The verdict of one guard. Only `Allow` and `AllowFramed` let rendering
/// continue into the guarded subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Allowed, and the subtree must be wrapped in the console chrome.
    AllowFramed,
    /// The guard navigated elsewhere; the current render is abandoned.
    Redirected(String),
    /// The session is still loading; render nothing and try again on the next state change.
    Deferred,
    /// The subtree renders nothing.
    Hidden,
}

impl GuardOutcome {
    pub fn allows(&self) -> bool {
        matches!(self, GuardOutcome::Allow | GuardOutcome::AllowFramed)
    }
}

/// AuthGuard
///
/// Lets authenticated viewers through. Everyone else is sent to the login page
/// with the requested path preserved, except while the session is loading,
/// where redirecting would only flicker.
pub struct AuthGuard;

impl AuthGuard {
    pub fn check(session: &SessionState, navigator: &mut dyn Navigator) -> GuardOutcome {
        match session.status() {
            AuthStatus::Authenticated => GuardOutcome::Allow,
            AuthStatus::Loading => GuardOutcome::Deferred,
            AuthStatus::Unauthenticated => {
                let target = login_redirect(navigator.current_path());
                navigator.navigate_to(&target);
                GuardOutcome::Redirected(target)
            }
        }
    }
}

/// FrameWrapper
///
/// [`AuthGuard`] plus the shared chrome around the page.
pub struct FrameWrapper;

impl FrameWrapper {
    pub fn check(session: &SessionState, navigator: &mut dyn Navigator) -> GuardOutcome {
        match AuthGuard::check(session, navigator) {
            GuardOutcome::Allow => GuardOutcome::AllowFramed,
            other => other,
        }
    }
}

/// GuestGuard
///
/// Keeps signed-in viewers off the login page by sending them on to the path
/// the login URL preserved.
pub struct GuestGuard;

impl GuestGuard {
    pub fn check(session: &SessionState, navigator: &mut dyn Navigator) -> GuardOutcome {
        match session.status() {
            AuthStatus::Unauthenticated => GuardOutcome::Allow,
            AuthStatus::Loading => GuardOutcome::Deferred,
            AuthStatus::Authenticated => {
                let target = retrieve_redirect(navigator.current_path());
                navigator.navigate_to(&target);
                GuardOutcome::Redirected(target)
            }
        }
    }
}

/// Computes a permission guard's flag from the store snapshot.
pub type VisibilitySelector = fn(&StoreSnapshot) -> bool;

/// What a permission guard does when its flag is `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Nothing,
    Redirect(&'static str),
}

/// PermissionGuard
///
/// Renders its children iff the flag it is handed is `true`. The guard never
/// derives the flag itself; the policy lives in the selector it carries.
#[derive(Clone, Copy)]
pub struct PermissionGuard {
    selector: VisibilitySelector,
    fallback: Fallback,
}

impl PermissionGuard {
    pub fn new(selector: VisibilitySelector) -> Self {
        Self {
            selector,
            fallback: Fallback::Nothing,
        }
    }

    pub fn or_redirect(mut self, path: &'static str) -> Self {
        self.fallback = Fallback::Redirect(path);
        self
    }

    pub fn selector(&self) -> VisibilitySelector {
        self.selector
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    pub fn check(&self, is_feature_visible: bool, navigator: &mut dyn Navigator) -> GuardOutcome {
        if is_feature_visible {
            return GuardOutcome::Allow;
        }
        match self.fallback {
            Fallback::Nothing => GuardOutcome::Hidden,
            Fallback::Redirect(path) => {
                navigator.navigate_to(path);
                GuardOutcome::Redirected(path.to_string())
            }
        }
    }
}

impl fmt::Debug for PermissionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionGuard")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Guard
///
/// The guards a route node may declare, evaluated in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum Guard {
    RequireAuth,
    AuthAndFrame,
    RequirePermission(PermissionGuard),
    GuestOnly,
}

impl Guard {
    pub fn evaluate(&self, snapshot: &StoreSnapshot, navigator: &mut dyn Navigator) -> GuardOutcome {
        match self {
            Guard::RequireAuth => AuthGuard::check(&snapshot.session, navigator),
            Guard::AuthAndFrame => FrameWrapper::check(&snapshot.session, navigator),
            Guard::GuestOnly => GuestGuard::check(&snapshot.session, navigator),
            Guard::RequirePermission(guard) => {
                let is_feature_visible = (guard.selector())(snapshot);
                guard.check(is_feature_visible, navigator)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Guard::RequireAuth => "require_auth",
            Guard::AuthAndFrame => "auth_and_frame",
            Guard::RequirePermission(_) => "require_permission",
            Guard::GuestOnly => "guest_only",
        }
    }
}
