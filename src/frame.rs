use askama::Template;

use crate::{
    markup::Markup,
    store::{StoreSnapshot, audit_log_visible, users_visible},
};

#[derive(Template)]
#[template(path = "frame.html")]
struct FrameTemplate<'a> {
    users_visible: bool,
    audit_log_visible: bool,
    username: Option<&'a str>,
    content: &'a Markup,
}

/// frame
///
/// Wraps page content in the console chrome: the navigation bar (with the
/// links the viewer may follow) and the footer.
pub fn frame(snapshot: &StoreSnapshot, content: &Markup) -> Markup {
    Markup::from_template(&FrameTemplate {
        users_visible: users_visible(snapshot),
        audit_log_visible: audit_log_visible(snapshot),
        username: snapshot.session.user().map(|user| user.username.as_str()),
        content,
    })
}
