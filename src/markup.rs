use std::fmt;

use askama::Template;

/// Markup
///
/// A fragment of HTML that is already safe to embed. Fragments come out of
/// the auto-escaping templates through [`Markup::from_template`]; only
/// trusted literals use [`Markup::raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Renders a template. A failed render is logged and yields nothing.
    pub fn from_template(template: &impl Template) -> Self {
        match template.render() {
            Ok(html) => Self(html),
            Err(err) => {
                tracing::error!(error = %err, "template render failed");
                Self::empty()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    title: &'a str,
    body: &'a Markup,
}

/// document
///
/// The full HTML page the console serves around a rendered route.
pub fn document(title: &str, body: &Markup) -> String {
    Markup::from_template(&DocumentTemplate { title, body }).into_string()
}
