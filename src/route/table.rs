use super::{
    matcher::{self, RouteMatch},
    node::RouteNode,
};
use crate::{
    config::BuildMode,
    guard::{Guard, PermissionGuard},
    page::PageId,
    store::audit_log_visible,
};

/// RouteTable
///
/// The console's route tree. Built once per process; resolution borrows it.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    /// console
    ///
    /// The full console route tree. The build mode is the only input: a
    /// production build sends `/audit` to the workspaces list, since the audit
    /// page is not finished yet.
    pub fn console(build: BuildMode) -> Self {
        use crate::guard::Guard::{AuthAndFrame, GuestOnly, RequireAuth};

        let audit = if build.is_production() {
            RouteNode::index().redirect("/workspaces")
        } else {
            RouteNode::index()
                .guard(AuthAndFrame)
                .guard(Guard::RequirePermission(
                    PermissionGuard::new(audit_log_visible).or_redirect("/workspaces"),
                ))
                .page(PageId::Audit)
        };

        Self::new(vec![
            RouteNode::index().guard(RequireAuth).redirect("/workspaces"),
            RouteNode::path("login").guard(GuestOnly).page(PageId::Login),
            RouteNode::path("setup").page(PageId::Setup),
            RouteNode::path("healthz").page(PageId::Healthz),
            RouteNode::path("cli-auth").guard(RequireAuth).page(PageId::CliAuth),
            RouteNode::path("workspaces").children(vec![
                RouteNode::index().guard(AuthAndFrame).page(PageId::Workspaces),
            ]),
            RouteNode::path("templates").children(vec![
                RouteNode::index().guard(AuthAndFrame).page(PageId::Templates),
                RouteNode::path(":template").children(vec![
                    RouteNode::index().guard(AuthAndFrame).page(PageId::Template),
                    RouteNode::path("workspace")
                        .guard(RequireAuth)
                        .page(PageId::CreateWorkspace),
                    RouteNode::path("settings")
                        .guard(RequireAuth)
                        .page(PageId::TemplateSettings),
                ]),
            ]),
            RouteNode::path("users").children(vec![
                RouteNode::index().guard(AuthAndFrame).page(PageId::Users),
                RouteNode::path("create").guard(RequireAuth).page(PageId::CreateUser),
            ]),
            RouteNode::path("audit").children(vec![audit]),
            RouteNode::path("settings")
                .guard(AuthAndFrame)
                .page(PageId::SettingsLayout)
                .children(vec![
                    RouteNode::path("account").page(PageId::Account),
                    RouteNode::path("security").page(PageId::Security),
                    RouteNode::path("ssh-keys").page(PageId::SshKeys),
                ]),
            RouteNode::path("@:username").children(vec![
                RouteNode::path(":workspace").children(vec![
                    RouteNode::index().guard(AuthAndFrame).page(PageId::Workspace),
                    RouteNode::path("schedule")
                        .guard(RequireAuth)
                        .page(PageId::WorkspaceSchedule),
                    RouteNode::path("terminal")
                        .guard(RequireAuth)
                        .page(PageId::Terminal),
                    RouteNode::path("apps").children(vec![
                        RouteNode::path(":app/*")
                            .guard(AuthAndFrame)
                            .page(PageId::WorkspaceAppError),
                    ]),
                    RouteNode::path("builds/:buildNumber")
                        .guard(AuthAndFrame)
                        .page(PageId::WorkspaceBuild),
                ]),
            ]),
            RouteNode::catch_all().page(PageId::NotFound),
        ])
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    /// Matches a location (query string and fragment are ignored).
    pub fn resolve(&self, location: &str) -> Option<RouteMatch<'_>> {
        let (path, _) = crate::navigation::split_path(location);
        matcher::resolve(&self.routes, path)
    }
}
