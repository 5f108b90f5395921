use std::collections::BTreeMap;

use crate::{
    frame::frame,
    guard::GuardOutcome,
    markup::Markup,
    navigation::Navigator,
    page::{PageId, PageRegistry, RenderContext},
    route::{Element, RouteMatch, RouteTable},
    store::StoreSnapshot,
};

/// RenderOutcome
///
/// The result of one render pass over the route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(RenderedView),
    /// The navigator was sent to `to`; nothing from this pass was rendered.
    Redirect { to: String },
    /// The session is loading; nothing was rendered.
    Deferred,
}

impl RenderOutcome {
    pub fn page(&self) -> Option<PageId> {
        match self {
            RenderOutcome::Rendered(view) => view.page,
            _ => None,
        }
    }
}

/// RenderedView
///
/// A completed render. `page` is the innermost page that rendered, or `None`
/// when a permission guard hid the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub page: Option<PageId>,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
    pub framed: bool,
    pub not_found: bool,
    pub markup: Markup,
}

impl RenderedView {
    pub fn status(&self) -> u16 {
        if self.not_found { 404 } else { 200 }
    }

    pub fn title(&self) -> &'static str {
        self.page.map(PageId::title).unwrap_or("Coder")
    }
}

struct Content {
    markup: Markup,
    page: Option<PageId>,
    framed: bool,
}

enum Halt {
    Redirect(String),
    Deferred,
}

/// render
///
/// Resolves the navigator's current location and renders it: guards run from
/// the outermost node inwards, a redirect or deferral anywhere abandons the
/// whole pass, and each page on the matched branch renders exactly once.
pub fn render(
    table: &RouteTable,
    pages: &PageRegistry,
    snapshot: &StoreSnapshot,
    navigator: &mut dyn Navigator,
) -> RenderOutcome {
    let location = navigator.current_path().to_string();

    let Some(matched) = table.resolve(&location) else {
        tracing::debug!(%location, "no route matched");
        return not_found(pages, snapshot, &location);
    };

    let mut pass = Pass {
        matched: &matched,
        pages,
        snapshot,
        location: &location,
        navigator,
    };

    match pass.render_node(0) {
        Ok(content) => RenderOutcome::Rendered(RenderedView {
            page: content.page,
            pattern: matched.pattern(),
            params: matched.params.clone(),
            framed: content.framed,
            not_found: matched.is_catch_all(),
            markup: content.markup,
        }),
        Err(Halt::Redirect(to)) => {
            tracing::debug!(%location, %to, "render redirected");
            RenderOutcome::Redirect { to }
        }
        Err(Halt::Deferred) => {
            tracing::debug!(%location, "render deferred while session loads");
            RenderOutcome::Deferred
        }
    }
}

struct Pass<'a, 't> {
    matched: &'a RouteMatch<'t>,
    pages: &'a PageRegistry,
    snapshot: &'a StoreSnapshot,
    location: &'a str,
    navigator: &'a mut dyn Navigator,
}

impl Pass<'_, '_> {
    fn render_node(&mut self, depth: usize) -> Result<Content, Halt> {
        let node = self.matched.nodes[depth];
        let mut framed = false;

        for guard in node.guards() {
            match guard.evaluate(self.snapshot, self.navigator) {
                GuardOutcome::Allow => {}
                GuardOutcome::AllowFramed => framed = true,
                GuardOutcome::Redirected(to) => return Err(Halt::Redirect(to)),
                GuardOutcome::Deferred => return Err(Halt::Deferred),
                GuardOutcome::Hidden => {
                    tracing::debug!(guard = guard.name(), "guard hid route content");
                    return Ok(self.finish(Markup::empty(), None, framed));
                }
            }
        }

        let is_leaf = depth + 1 == self.matched.nodes.len();
        let child = if is_leaf {
            None
        } else {
            Some(self.render_node(depth + 1)?)
        };

        match node.element() {
            Some(Element::Redirect(to)) => {
                self.navigator.navigate_to(to);
                Err(Halt::Redirect(to.to_string()))
            }
            Some(Element::Page(page)) => {
                let (outlet, inner_page, inner_framed) = match child {
                    Some(child) => (Some(child.markup), child.page, child.framed),
                    None => (None, Some(*page), false),
                };
                let ctx = RenderContext {
                    page: *page,
                    location: self.location,
                    params: &self.matched.params,
                    snapshot: self.snapshot,
                    outlet,
                };
                let markup = self.pages.render(&ctx);
                Ok(self.finish(markup, inner_page, framed || inner_framed))
            }
            // a path-only node just passes its child through
            None => match child {
                Some(child) => {
                    let wrapped = self.finish(child.markup, child.page, framed);
                    Ok(Content {
                        framed: wrapped.framed || child.framed,
                        ..wrapped
                    })
                }
                None => Ok(self.finish(Markup::empty(), None, framed)),
            },
        }
    }

    fn finish(&self, markup: Markup, page: Option<PageId>, framed: bool) -> Content {
        let markup = if framed {
            frame(self.snapshot, &markup)
        } else {
            markup
        };
        Content {
            markup,
            page,
            framed,
        }
    }
}

fn not_found(pages: &PageRegistry, snapshot: &StoreSnapshot, location: &str) -> RenderOutcome {
    let params = BTreeMap::new();
    let ctx = RenderContext {
        page: PageId::NotFound,
        location,
        params: &params,
        snapshot,
        outlet: None,
    };
    RenderOutcome::Rendered(RenderedView {
        page: Some(PageId::NotFound),
        pattern: "*".to_string(),
        markup: pages.render(&ctx),
        params,
        framed: false,
        not_found: true,
    })
}
