mod common;

use common::{CountingPage, alice, all_grants, licensed};
use workspace_console::{
    config::BuildMode,
    console::{Console, ConsoleApp, MAX_REDIRECTS},
    entitlements::FeatureName,
    page::{PageId, PageRegistry},
    render::RenderOutcome,
    route::{RouteNode, RouteTable},
    session::AuthStatus,
    store::{ClientStateStore, StoreEvent},
};

fn signed_in_event() -> StoreEvent {
    StoreEvent::SignedIn {
        user: alice(),
        permissions: all_grants(),
    }
}

#[test]
fn test_deferred_render_resumes_once_session_is_known() {
    let app_console = Console::standard(BuildMode::Development);
    let mut app = ConsoleApp::new(app_console, ClientStateStore::new(), "/templates/docker/workspace");

    assert_eq!(app.outcome(), &RenderOutcome::Deferred);
    assert_eq!(app.history(), ["/templates/docker/workspace"]);

    let outcome = app.dispatch(StoreEvent::SignedOut).clone();
    assert_eq!(outcome.page(), Some(PageId::Login));
    assert_eq!(
        app.location(),
        "/login?redirect=%2Ftemplates%2Fdocker%2Fworkspace"
    );

    let outcome = app.dispatch(signed_in_event()).clone();
    assert_eq!(outcome.page(), Some(PageId::CreateWorkspace));
    assert_eq!(app.location(), "/templates/docker/workspace");
    assert_eq!(app.history().len(), 3);
    assert_eq!(app.store().select_session().status(), AuthStatus::Authenticated);
}

#[test]
fn test_sign_out_while_on_a_page_returns_to_login() {
    let mut store = ClientStateStore::new();
    store.dispatch(signed_in_event());
    let mut app = ConsoleApp::new(Console::standard(BuildMode::Development), store, "/users");
    assert_eq!(app.outcome().page(), Some(PageId::Users));

    app.dispatch(StoreEvent::SignedOut);

    assert_eq!(app.outcome().page(), Some(PageId::Login));
    assert_eq!(app.location(), "/login?redirect=%2Fusers");
}

#[test]
fn test_visit_follows_links() {
    let mut store = ClientStateStore::new();
    store.dispatch(signed_in_event());
    let mut app = ConsoleApp::new(Console::standard(BuildMode::Development), store, "/");
    assert_eq!(app.outcome().page(), Some(PageId::Workspaces));

    assert_eq!(app.visit("/templates/docker").page(), Some(PageId::Template));
    assert_eq!(app.visit("/settings/ssh-keys").page(), Some(PageId::SshKeys));
    // not licensed for the audit log
    assert_eq!(app.visit("/audit").page(), Some(PageId::Workspaces));

    app.dispatch(StoreEvent::EntitlementsRefreshed(licensed(&[FeatureName::AuditLog])));
    assert_eq!(app.visit("/audit").page(), Some(PageId::Audit));
}

#[test]
fn test_unchanged_store_does_not_rerender() {
    let counter = CountingPage::default();
    let mut pages = PageRegistry::standard();
    pages.register(PageId::NotFound, counter.clone());
    let console = Console::new(RouteTable::console(BuildMode::Development), pages);

    let mut store = ClientStateStore::new();
    store.dispatch(StoreEvent::SignedOut);
    let mut app = ConsoleApp::new(console, store, "/nowhere");
    assert_eq!(counter.count(), 1);

    // ignored by the store: signed out
    app.dispatch(StoreEvent::PermissionsRefreshed(all_grants()));
    assert_eq!(counter.count(), 1);

    app.dispatch(StoreEvent::EntitlementsRefreshed(licensed(&[])));
    assert_eq!(counter.count(), 2);
}

#[test]
fn test_redirect_loop_is_cut_off() {
    let table = RouteTable::new(vec![
        RouteNode::path("a").redirect("/b"),
        RouteNode::path("b").redirect("/a"),
    ]);
    let console = Console::new(table, PageRegistry::standard());

    let app = ConsoleApp::new(console, ClientStateStore::new(), "/a");

    assert!(matches!(app.outcome(), RenderOutcome::Redirect { .. }));
    // the initial entry, then one navigation per render pass
    assert_eq!(app.history().len(), 1 + MAX_REDIRECTS + 1);
}
