//! Functions turning fetched records into detached element trees.
//!
//! The article and section builders fetch what they need through the
//! [`Client`]. A failed fetch degrades only the node being built.

use blogfeed_client::{Client, Comment, Post, PostId, Transport, User};
use blogfeed_dom::{element, Node};
use futures::future::{join, join_all};

use crate::{HIDDEN_CLASS, POST_ID_ATTR, SHOW_LABEL};

/// Class of the paragraph shown in place of the author when the author fetch fails.
pub const AUTHOR_UNAVAILABLE_CLASS: &str = "author-unavailable";

/// One `<option value=id>name</option>` per user, in input order.
pub fn build_option_list(users: &[User]) -> Vec<Node> {
    users
        .iter()
        .map(|user| element!("option", "value" => user.id; user.name.as_str()))
        .collect()
}

/// Appends an option per user to `select`. Without users this does nothing
/// and returns `None`.
pub fn populate_select_menu(select: &Node, users: Option<&[User]>) -> Option<Node> {
    let users = users?;
    for option in build_option_list(users) {
        select.append(&option);
    }
    Some(select.clone())
}

/// A fragment of comment blocks, each `h3` name, `p` body, `p` "From: {email}".
pub fn build_comment_thread(comments: &[Comment]) -> Node {
    comments
        .iter()
        .map(|comment| {
            element!("article";
                element!("h3"; comment.name.as_str()),
                element!("p"; comment.body.as_str()),
                element!("p"; format!("From: {}", comment.email)),
            )
        })
        .collect()
}

/// A collapsed `section.comments` for `post_id`, filled with its comments.
///
/// Returns `None` without fetching when there is no post id. A failed comment
/// fetch leaves the section empty.
pub async fn build_comment_section<T: Transport>(
    client: &Client<T>,
    post_id: Option<PostId>,
) -> Option<Node> {
    let post_id = post_id?;

    let section = element!(
        "section",
        "class" => format!("comments {HIDDEN_CLASS}"),
        POST_ID_ATTR => post_id.to_string()
    );
    if let Ok(comments) = client.post_comments(Some(post_id)).await {
        section.append(&build_comment_thread(&comments));
    }
    Some(section)
}

/// A complete article for `post`, joined with its author and comments.
///
/// The author fetch and the comment section build run concurrently and both
/// finish before the article is returned. Without an author the two author
/// paragraphs are replaced by a single "Author unavailable" paragraph.
pub async fn build_post_article<T: Transport>(client: &Client<T>, post: &Post) -> Node {
    let article = element!("article";
        element!("h2"; post.title.as_str()),
        element!("p"; post.body.as_str()),
        element!("p"; format!("Post ID: {}", post.id)),
    );

    let (author, section) = join(
        client.user(post.author_id()),
        build_comment_section(client, post.post_id()),
    )
    .await;

    match author {
        Ok(user) => {
            article.append(&element!("p"; format!("Author: {} with {}", user.name, user.company.name)));
            article.append(&element!("p"; user.company.catch_phrase.as_str()));
        }
        Err(err) => {
            tracing::debug!(post = post.id, error = %err, "rendering post without author");
            article.append(&element!("p", "class" => AUTHOR_UNAVAILABLE_CLASS; "Author unavailable"));
        }
    }

    article.append(&element!("button", POST_ID_ATTR => post.id; SHOW_LABEL));
    if let Some(section) = section {
        article.append(&section);
    }
    article
}

/// Builds every article concurrently into one fragment, in `posts` order.
pub async fn build_all_articles<T: Transport>(client: &Client<T>, posts: &[Post]) -> Node {
    join_all(posts.iter().map(|post| build_post_article(client, post)))
        .await
        .into_iter()
        .collect()
}
