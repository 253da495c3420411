//! Show/hide state of comment sections.
//!
//! A section is `hidden` while it carries [`HIDDEN_CLASS`] and `shown`
//! otherwise. Every operation is keyed by post id. An absent id or an unknown
//! post is a no-op that returns `None`.

use blogfeed_client::PostId;
use blogfeed_dom::Node;

use crate::{surface::Registry, RenderSurface, HIDDEN_CLASS, HIDE_LABEL, SHOW_LABEL};

/// Result of a completed [`RenderSurface::toggle_comments`].
#[derive(Clone, Debug)]
pub struct Toggled {
    pub section: Node,
    pub button: Node,
    pub shown: bool,
}

/// The toggle label matching a section's visibility.
pub fn label_for(shown: bool) -> &'static str {
    if shown {
        HIDE_LABEL
    } else {
        SHOW_LABEL
    }
}

pub(crate) fn toggle_section(registry: &Registry, post_id: Option<PostId>) -> Option<Node> {
    let section = registry.section(post_id?)?;
    section.toggle_class(HIDDEN_CLASS);
    Some(section)
}

pub(crate) fn toggle_button_label(registry: &Registry, post_id: Option<PostId>) -> Option<Node> {
    let button = registry.button(post_id?)?;
    let next = if button.text_content() == SHOW_LABEL {
        HIDE_LABEL
    } else {
        SHOW_LABEL
    };
    button.set_text_content(next);
    Some(button)
}

pub(crate) fn toggle_comments(registry: &Registry, post_id: Option<PostId>) -> Option<Toggled> {
    let post_id = post_id?;

    // both targets must exist before either changes
    let section = registry.section(post_id)?;
    let button = registry.button(post_id)?;

    let shown = !section.toggle_class(HIDDEN_CLASS);
    button.set_text_content(label_for(shown));

    tracing::trace!(%post_id, shown, "toggled comments");
    Some(Toggled {
        section,
        button,
        shown,
    })
}

impl RenderSurface {
    /// Flips the visibility class of the section for `post_id`.
    pub fn toggle_section(&self, post_id: Option<PostId>) -> Option<Node> {
        toggle_section(&self.registry(), post_id)
    }

    /// Flips the text of the toggle control for `post_id` between the two labels.
    pub fn toggle_button_label(&self, post_id: Option<PostId>) -> Option<Node> {
        toggle_button_label(&self.registry(), post_id)
    }

    /// Flips the section and sets the control's label from the section's new
    /// state. Nothing changes unless both exist.
    pub fn toggle_comments(&self, post_id: Option<PostId>) -> Option<Toggled> {
        toggle_comments(&self.registry(), post_id)
    }

    /// Whether the section for `post_id` is currently expanded.
    pub fn is_shown(&self, post_id: PostId) -> Option<bool> {
        let section = self.registry().section(post_id)?;
        Some(!section.has_class(HIDDEN_CLASS))
    }
}
