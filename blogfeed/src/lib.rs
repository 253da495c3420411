#![warn(clippy::use_self)]

//! Joins users, posts and comments into an article feed with collapsible
//! comment sections.

pub mod builders;
pub mod controller;
pub mod feed;
pub mod surface;

#[cfg(test)]
mod fixtures;

pub use blogfeed_client as client;
pub use blogfeed_dom as dom;

pub use self::{
    controller::Toggled,
    feed::{Feed, PostSource, RenderSummary},
    surface::RenderSurface,
};

/// Attribute carrying the post id on toggle controls and comment sections.
pub const POST_ID_ATTR: &str = "data-post-id";

/// Class present on a comment section while it is collapsed.
pub const HIDDEN_CLASS: &str = "hide";

pub const SHOW_LABEL: &str = "Show Comments";
pub const HIDE_LABEL: &str = "Hide Comments";
