use axum::http::Uri;

/// Where unauthenticated viewers are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where a viewer lands after login when no redirect target was preserved.
pub const DEFAULT_REDIRECT: &str = "/";
/// Query parameter carrying the path to return to after login.
pub const REDIRECT_PARAM: &str = "redirect";

/// Navigator
///
/// The redirect primitive and "current path" accessor the guards depend on.
/// Paths include their query string.
pub trait Navigator {
    fn current_path(&self) -> &str;
    fn navigate_to(&mut self, path: &str);
}

/// MemoryNavigator
///
/// In-memory browser history, used by the [`crate::console::Console`] driver.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            history: vec![initial.to_string()],
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> &str {
        // history is never empty: it starts with the initial entry and only grows
        self.history.last().map(String::as_str).unwrap_or(DEFAULT_REDIRECT)
    }

    fn navigate_to(&mut self, path: &str) {
        tracing::debug!(from = %self.current_path(), to = %path, "navigate");
        self.history.push(path.to_string());
    }
}

/// RequestNavigator
///
/// Navigator for one HTTP request: a navigation is recorded and later turned
/// into a redirect response instead of being followed in-process.
#[derive(Debug, Clone)]
pub struct RequestNavigator {
    requested: String,
    redirected_to: Option<String>,
}

impl RequestNavigator {
    pub fn new(requested: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            redirected_to: None,
        }
    }

    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }
}

impl Navigator for RequestNavigator {
    fn current_path(&self) -> &str {
        self.redirected_to.as_deref().unwrap_or(&self.requested)
    }

    fn navigate_to(&mut self, path: &str) {
        self.redirected_to = Some(path.to_string());
    }
}

/// split_path
///
/// Splits `"/a/b?x=1"` into `("/a/b", Some("x=1"))`. A fragment is dropped.
pub fn split_path(location: &str) -> (&str, Option<&str>) {
    let location = location.split('#').next().unwrap_or_default();
    match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    }
}

/// login_redirect
///
/// The login URL that brings the viewer back to `current` afterwards.
/// Repeated leading slashes collapse to one so the target stays local.
pub fn login_redirect(current: &str) -> String {
    let current = format!("/{}", current.trim_start_matches('/'));
    format!(
        "{LOGIN_PATH}?{REDIRECT_PARAM}={}",
        urlencoding::encode(&current)
    )
}

/// retrieve_redirect
///
/// Reads the preserved target from a login URL. Anything that is not a local
/// path falls back to [`DEFAULT_REDIRECT`].
pub fn retrieve_redirect(location: &str) -> String {
    let (_, query) = split_path(location);
    query
        .into_iter()
        .flat_map(|query| query.split('&'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == REDIRECT_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string())
}

/// is_local_path
///
/// Local paths start with a single slash and parse as a bare path and query.
/// Browsers drop tabs and newlines and read `\` as `/`, so `/\t/host` would
/// leave the site; control characters, whitespace and backslashes are refused.
pub fn is_local_path(target: &str) -> bool {
    if !target.starts_with('/') || target.starts_with("//") {
        return false;
    }
    if target
        .chars()
        .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
    {
        return false;
    }
    target
        .parse::<Uri>()
        .is_ok_and(|uri| uri.scheme().is_none() && uri.authority().is_none())
}
