use crate::{guard::Guard, page::PageId};

/// Segment
///
/// One `/`-separated piece of a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `templates`: matches the same text, ASCII case-insensitively.
    Static(String),
    /// `:template`: matches any one non-empty segment.
    Param(String),
    /// `@:username`: a literal prefix followed by a parameter within one segment.
    Prefixed { prefix: String, name: String },
    /// `*`: matches the rest of the path, possibly nothing.
    Splat,
}

impl Segment {
    pub fn parse(raw: &str) -> Segment {
        if raw == "*" {
            return Segment::Splat;
        }
        if let Some(name) = raw.strip_prefix(':') {
            return Segment::Param(name.to_string());
        }
        match raw.split_once(':') {
            Some((prefix, name)) if !name.is_empty() => Segment::Prefixed {
                prefix: prefix.to_string(),
                name: name.to_string(),
            },
            _ => Segment::Static(raw.to_string()),
        }
    }
}

/// Element
///
/// What a matched node produces once its guards pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Page(PageId),
    /// Navigate elsewhere instead of rendering (replaces the current entry).
    Redirect(&'static str),
}

/// RouteNode
///
/// A node of the declarative route tree. A node with children and an element
/// is a layout: its element renders with the matched child in its outlet.
#[derive(Debug, Clone)]
pub struct RouteNode {
    path: String,
    segments: Vec<Segment>,
    index: bool,
    element: Option<Element>,
    guards: Vec<Guard>,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// A node matching `path`, which may span several segments (`builds/:buildNumber`).
    pub fn path(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        Self {
            path: trimmed.to_string(),
            segments: trimmed
                .split('/')
                .filter(|s| !s.is_empty())
                .map(Segment::parse)
                .collect(),
            index: false,
            element: None,
            guards: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A node matching exactly its parent's path.
    pub fn index() -> Self {
        Self {
            index: true,
            ..Self::path("")
        }
    }

    /// The node that matches when nothing else does.
    pub fn catch_all() -> Self {
        Self::path("*")
    }

    pub fn page(mut self, page: PageId) -> Self {
        self.element = Some(Element::Page(page));
        self
    }

    pub fn redirect(mut self, to: &'static str) -> Self {
        self.element = Some(Element::Redirect(to));
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children.extend(children);
        self
    }

    // --- Accessors ---

    pub fn raw_path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_index(&self) -> bool {
        self.index
    }

    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn child_nodes(&self) -> &[RouteNode] {
        &self.children
    }

    pub fn is_catch_all(&self) -> bool {
        self.segments == [Segment::Splat]
    }
}
