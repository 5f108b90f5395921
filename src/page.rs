use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, OnceLock},
};

use askama::Template;

use crate::{
    markup::Markup,
    navigation::retrieve_redirect,
    store::StoreSnapshot,
};

/// PageId
///
/// Every page the console can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageId {
    Login,
    Setup,
    Healthz,
    CliAuth,
    Workspaces,
    Templates,
    Template,
    CreateWorkspace,
    TemplateSettings,
    Users,
    CreateUser,
    Audit,
    SettingsLayout,
    Account,
    Security,
    SshKeys,
    Workspace,
    WorkspaceSchedule,
    Terminal,
    WorkspaceAppError,
    WorkspaceBuild,
    NotFound,
}

impl PageId {
    pub const ALL: [PageId; 22] = [
        PageId::Login,
        PageId::Setup,
        PageId::Healthz,
        PageId::CliAuth,
        PageId::Workspaces,
        PageId::Templates,
        PageId::Template,
        PageId::CreateWorkspace,
        PageId::TemplateSettings,
        PageId::Users,
        PageId::CreateUser,
        PageId::Audit,
        PageId::SettingsLayout,
        PageId::Account,
        PageId::Security,
        PageId::SshKeys,
        PageId::Workspace,
        PageId::WorkspaceSchedule,
        PageId::Terminal,
        PageId::WorkspaceAppError,
        PageId::WorkspaceBuild,
        PageId::NotFound,
    ];

    /// Component name, as the front end knows the page.
    pub fn name(self) -> &'static str {
        match self {
            PageId::Login => "LoginPage",
            PageId::Setup => "SetupPage",
            PageId::Healthz => "HealthzPage",
            PageId::CliAuth => "CliAuthenticationPage",
            PageId::Workspaces => "WorkspacesPage",
            PageId::Templates => "TemplatesPage",
            PageId::Template => "TemplatePage",
            PageId::CreateWorkspace => "CreateWorkspacePage",
            PageId::TemplateSettings => "TemplateSettingsPage",
            PageId::Users => "UsersPage",
            PageId::CreateUser => "CreateUserPage",
            PageId::Audit => "AuditPage",
            PageId::SettingsLayout => "SettingsLayout",
            PageId::Account => "AccountPage",
            PageId::Security => "SecurityPage",
            PageId::SshKeys => "SSHKeysPage",
            PageId::Workspace => "WorkspacePage",
            PageId::WorkspaceSchedule => "WorkspaceSchedulePage",
            PageId::Terminal => "TerminalPage",
            PageId::WorkspaceAppError => "WorkspaceAppErrorPage",
            PageId::WorkspaceBuild => "WorkspaceBuildPage",
            PageId::NotFound => "NotFoundPage",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageId::Login => "Sign in",
            PageId::Setup => "Set up your account",
            PageId::Healthz => "Health",
            PageId::CliAuth => "CLI authentication",
            PageId::Workspaces => "Workspaces",
            PageId::Templates => "Templates",
            PageId::Template => "Template",
            PageId::CreateWorkspace => "Create workspace",
            PageId::TemplateSettings => "Template settings",
            PageId::Users => "Users",
            PageId::CreateUser => "Create user",
            PageId::Audit => "Audit",
            PageId::SettingsLayout => "Settings",
            PageId::Account => "Account",
            PageId::Security => "Security",
            PageId::SshKeys => "SSH keys",
            PageId::Workspace => "Workspace",
            PageId::WorkspaceSchedule => "Workspace schedule",
            PageId::Terminal => "Terminal",
            PageId::WorkspaceAppError => "Application error",
            PageId::WorkspaceBuild => "Build",
            PageId::NotFound => "Not found",
        }
    }

    /// Heavy pages are loaded on first use.
    pub fn loads_lazily(self) -> bool {
        matches!(
            self,
            PageId::Workspaces
                | PageId::CreateWorkspace
                | PageId::Audit
                | PageId::Terminal
                | PageId::WorkspaceAppError
        )
    }
}

/// RenderContext
///
/// What a page gets to look at while rendering.
pub struct RenderContext<'a> {
    pub page: PageId,
    /// The full requested location, query included.
    pub location: &'a str,
    pub params: &'a BTreeMap<String, String>,
    pub snapshot: &'a StoreSnapshot,
    /// The matched child route, for layout pages.
    pub outlet: Option<Markup>,
}

impl RenderContext<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Renderable
///
/// The capability every page provides. How the implementation gets loaded is
/// its own business (see [`EagerPage`] and [`LazyPage`]).
pub trait Renderable: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>) -> Markup;
}

/// PageView
///
/// The server-side view of a page: a titled container carrying the route
/// parameters as data attributes for the client bundle to hydrate.
#[derive(Debug, Clone, Copy)]
pub struct PageView;

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    name: &'static str,
    title: &'static str,
    params: Vec<(&'a str, &'a str)>,
    body: PageBody,
    outlet: Option<&'a Markup>,
}

/// Page-specific content under the heading.
enum PageBody {
    Login(String),
    NotFound,
    Healthz,
    Plain,
}

impl Renderable for PageView {
    fn render(&self, ctx: &RenderContext<'_>) -> Markup {
        let params = ctx
            .params
            .iter()
            .map(|(name, value)| {
                let name = if name == "*" { "splat" } else { name.as_str() };
                (name, value.as_str())
            })
            .collect();
        let body = match ctx.page {
            PageId::Login => PageBody::Login(retrieve_redirect(ctx.location)),
            PageId::NotFound => PageBody::NotFound,
            PageId::Healthz => PageBody::Healthz,
            _ => PageBody::Plain,
        };

        Markup::from_template(&PageTemplate {
            name: ctx.page.name(),
            title: ctx.page.title(),
            params,
            body,
            outlet: ctx.outlet.as_ref(),
        })
    }
}

/// EagerPage
///
/// A page whose implementation is ready from the start.
pub struct EagerPage {
    view: Box<dyn Renderable>,
}

impl EagerPage {
    pub fn new(view: impl Renderable + 'static) -> Self {
        Self {
            view: Box::new(view),
        }
    }
}

impl Renderable for EagerPage {
    fn render(&self, ctx: &RenderContext<'_>) -> Markup {
        self.view.render(ctx)
    }
}

type PageLoader = Box<dyn Fn() -> Box<dyn Renderable> + Send + Sync>;

/// LazyPage
///
/// A page whose implementation is produced by its loader on first render and
/// reused afterwards.
pub struct LazyPage {
    page: PageId,
    loader: PageLoader,
    loaded: OnceLock<Box<dyn Renderable>>,
}

impl LazyPage {
    pub fn new<F>(page: PageId, loader: F) -> Self
    where
        F: Fn() -> Box<dyn Renderable> + Send + Sync + 'static,
    {
        Self {
            page,
            loader: Box::new(loader),
            loaded: OnceLock::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

impl Renderable for LazyPage {
    fn render(&self, ctx: &RenderContext<'_>) -> Markup {
        let view = self.loaded.get_or_init(|| {
            tracing::debug!(page = self.page.name(), "loading page module");
            (self.loader)()
        });
        view.render(ctx)
    }
}

/// PageRegistry
///
/// Maps page ids to their implementations, independently of the route table.
#[derive(Clone, Default)]
pub struct PageRegistry {
    pages: HashMap<PageId, Arc<dyn Renderable>>,
}

impl PageRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every page as a [`PageView`], lazy where [`PageId::loads_lazily`] says so.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for page in PageId::ALL {
            if page.loads_lazily() {
                registry.register(page, LazyPage::new(page, || Box::new(PageView)));
            } else {
                registry.register(page, EagerPage::new(PageView));
            }
        }
        registry
    }

    pub fn register(&mut self, page: PageId, renderable: impl Renderable + 'static) -> &mut Self {
        self.pages.insert(page, Arc::new(renderable));
        self
    }

    /// Renders through the registered implementation, or a plain [`PageView`]
    /// when none was registered.
    pub fn render(&self, ctx: &RenderContext<'_>) -> Markup {
        match self.pages.get(&ctx.page) {
            Some(renderable) => renderable.render(ctx),
            None => PageView.render(ctx),
        }
    }
}
