use workspace_console::{
    config::BuildMode,
    guard::Guard,
    page::PageId,
    route::{Element, RouteNode, RouteTable, Segment},
};

fn table() -> RouteTable {
    RouteTable::console(BuildMode::Development)
}

fn page_at(path: &str) -> Option<PageId> {
    table().resolve(path).and_then(|m| m.page())
}

// --- Segment parsing ---

#[test]
fn test_segment_parse_kinds() {
    assert_eq!(Segment::parse("templates"), Segment::Static("templates".into()));
    assert_eq!(Segment::parse(":template"), Segment::Param("template".into()));
    assert_eq!(
        Segment::parse("@:username"),
        Segment::Prefixed {
            prefix: "@".into(),
            name: "username".into()
        }
    );
    assert_eq!(Segment::parse("*"), Segment::Splat);
}

// --- Catch-all ---

#[test]
fn test_unknown_paths_hit_the_catch_all() {
    let table = table();
    for path in [
        "/unknown/path",
        "/workspace",
        "/templates/docker/unknown",
        "/users/create/extra",
        "/@alice",
        "/@/dev",
        "/settings/account/extra",
        "/healthz/deep",
    ] {
        let matched = table.resolve(path).expect("catch-all always matches");
        assert!(matched.is_catch_all(), "{path} should not match a declared route");
        assert_eq!(matched.page(), Some(PageId::NotFound), "{path}");
    }
}

#[test]
fn test_declared_paths_never_hit_the_catch_all() {
    let table = table();
    for path in [
        "/",
        "/login",
        "/setup",
        "/healthz",
        "/cli-auth",
        "/workspaces",
        "/templates",
        "/templates/docker",
        "/templates/docker/workspace",
        "/templates/docker/settings",
        "/users",
        "/users/create",
        "/audit",
        "/settings",
        "/settings/account",
        "/settings/security",
        "/settings/ssh-keys",
        "/@alice/dev",
        "/@alice/dev/schedule",
        "/@alice/dev/terminal",
        "/@alice/dev/apps/code-server",
        "/@alice/dev/builds/3",
    ] {
        let matched = table.resolve(path).expect("declared path matches");
        assert!(!matched.is_catch_all(), "{path} fell through to the catch-all");
    }
}

// --- Scenarios and parameters ---

#[test]
fn test_create_workspace_route() {
    let table = table();
    let matched = table.resolve("/templates/docker/workspace").unwrap();

    assert_eq!(matched.page(), Some(PageId::CreateWorkspace));
    assert_eq!(matched.param("template"), Some("docker"));
    assert_eq!(matched.pattern(), "/templates/:template/workspace");
    assert!(matches!(matched.leaf().guards(), [Guard::RequireAuth]));
}

#[test]
fn test_index_routes_win_over_their_parent() {
    assert_eq!(page_at("/templates"), Some(PageId::Templates));
    assert_eq!(page_at("/templates/docker"), Some(PageId::Template));
    assert_eq!(page_at("/users"), Some(PageId::Users));
    assert_eq!(page_at("/workspaces"), Some(PageId::Workspaces));
    assert_eq!(page_at("/@alice/dev"), Some(PageId::Workspace));
}

#[test]
fn test_root_index_redirects_to_workspaces() {
    let table = table();
    let matched = table.resolve("/").unwrap();

    assert_eq!(matched.pattern(), "/");
    assert_eq!(matched.leaf().element(), Some(&Element::Redirect("/workspaces")));
}

#[test]
fn test_workspace_routes_extract_owner_and_build() {
    let table = table();

    let build = table.resolve("/@alice/dev/builds/42").unwrap();
    assert_eq!(build.page(), Some(PageId::WorkspaceBuild));
    assert_eq!(build.param("username"), Some("alice"));
    assert_eq!(build.param("workspace"), Some("dev"));
    assert_eq!(build.param("buildNumber"), Some("42"));
    assert_eq!(build.pattern(), "/@:username/:workspace/builds/:buildNumber");

    let schedule = table.resolve("/@bob/main/schedule").unwrap();
    assert_eq!(schedule.page(), Some(PageId::WorkspaceSchedule));
    assert_eq!(schedule.param("username"), Some("bob"));
}

#[test]
fn test_build_numbers_are_not_validated() {
    let table = table();
    let matched = table.resolve("/@alice/dev/builds/not-a-number").unwrap();
    assert_eq!(matched.page(), Some(PageId::WorkspaceBuild));
    assert_eq!(matched.param("buildNumber"), Some("not-a-number"));
}

#[test]
fn test_app_routes_capture_the_rest_of_the_path() {
    let table = table();

    let deep = table.resolve("/@alice/dev/apps/code-server/some/deep/path").unwrap();
    assert_eq!(deep.page(), Some(PageId::WorkspaceAppError));
    assert_eq!(deep.param("app"), Some("code-server"));
    assert_eq!(deep.param("*"), Some("some/deep/path"));

    let bare = table.resolve("/@alice/dev/apps/code-server").unwrap();
    assert_eq!(bare.page(), Some(PageId::WorkspaceAppError));
    assert_eq!(bare.param("*"), Some(""));
}

#[test]
fn test_settings_is_a_layout_around_its_children() {
    let table = table();

    let account = table.resolve("/settings/account").unwrap();
    assert_eq!(account.nodes.len(), 2);
    assert_eq!(
        account.nodes[0].element(),
        Some(&Element::Page(PageId::SettingsLayout))
    );
    assert_eq!(account.page(), Some(PageId::Account));

    let layout = table.resolve("/settings").unwrap();
    assert_eq!(layout.nodes.len(), 1);
    assert_eq!(layout.page(), Some(PageId::SettingsLayout));
}

// --- Normalisation ---

#[test]
fn test_slashes_case_query_and_encoding() {
    assert_eq!(page_at("/workspaces/"), Some(PageId::Workspaces));
    assert_eq!(page_at("//templates//docker/"), Some(PageId::Template));
    assert_eq!(page_at("/TEMPLATES"), Some(PageId::Templates));
    assert_eq!(page_at("/workspaces?filter=owner:me"), Some(PageId::Workspaces));
    assert_eq!(page_at("/users#top"), Some(PageId::Users));

    let table = table();
    let encoded = table.resolve("/templates/my%20template/settings").unwrap();
    assert_eq!(encoded.page(), Some(PageId::TemplateSettings));
    assert_eq!(encoded.param("template"), Some("my template"));
}

// --- Build modes ---

#[test]
fn test_audit_element_depends_on_build_mode() {
    let production = RouteTable::console(BuildMode::Production);
    let matched = production.resolve("/audit").unwrap();
    assert!(matched.leaf().guards().is_empty());
    assert_eq!(matched.leaf().element(), Some(&Element::Redirect("/workspaces")));

    let development = RouteTable::console(BuildMode::Development);
    let matched = development.resolve("/audit").unwrap();
    assert_eq!(matched.page(), Some(PageId::Audit));
    assert!(matches!(
        matched.leaf().guards(),
        [Guard::AuthAndFrame, Guard::RequirePermission(_)]
    ));
}

// --- Specificity ---

#[test]
fn test_static_beats_dynamic_regardless_of_declaration_order() {
    let table = RouteTable::new(vec![
        RouteNode::path("things/:id").page(PageId::Template),
        RouteNode::path("things/new").page(PageId::CreateWorkspace),
        RouteNode::catch_all().page(PageId::NotFound),
    ]);

    let new = table.resolve("/things/new").unwrap();
    assert_eq!(new.page(), Some(PageId::CreateWorkspace));
    assert!(new.params.is_empty());

    let other = table.resolve("/things/7").unwrap();
    assert_eq!(other.page(), Some(PageId::Template));
    assert_eq!(other.param("id"), Some("7"));
}

#[test]
fn test_node_without_element_or_index_does_not_match_alone() {
    let table = RouteTable::new(vec![
        RouteNode::path("parent").children(vec![RouteNode::path("child").page(PageId::Users)]),
    ]);

    assert!(table.resolve("/parent").is_none());
    assert_eq!(
        table.resolve("/parent/child").and_then(|m| m.page()),
        Some(PageId::Users)
    );
}
