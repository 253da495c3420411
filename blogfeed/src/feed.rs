use std::collections::HashSet;

use blogfeed_client::{Client, FetchError, HttpTransport, Post, Transport};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{builders, surface::RenderSurface};

/// Where the posts of a render pass come from.
#[derive(Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum PostSource {
    /// A single `GET /posts`.
    #[default]
    All,
    /// `GET /users`, then every user's posts, concatenated in user order.
    PerUser,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct RenderSummary {
    pub articles: usize,
    /// Articles rendered without their author.
    pub unattributed: usize,
    pub toggles: usize,
    /// The post listing itself could not be fetched.
    pub failed: bool,
}

pub struct Feed<T = HttpTransport> {
    client: Client<T>,
    surface: RenderSurface,
    source: PostSource,
}

impl<T: Transport> Feed<T> {
    pub fn new(client: Client<T>) -> Self {
        Self {
            client,
            surface: RenderSurface::new(),
            source: PostSource::default(),
        }
    }

    pub fn with_source(mut self, source: PostSource) -> Self {
        self.source = source;
        self
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    /// Runs one full render pass.
    ///
    /// All fetching and building finishes before the surface is touched, and
    /// the surface is then replaced without suspending. If the posts cannot be
    /// fetched the surface is left empty.
    pub async fn render(&self) -> RenderSummary {
        let (posts, failed) = match self.fetch_posts().await {
            Ok(posts) => (dedup_posts(posts), false),
            Err(_) => (vec![], true),
        };

        let fragment = builders::build_all_articles(&self.client, &posts).await;
        let unattributed = fragment
            .find_all(|node| {
                node.is_element() && node.has_class(builders::AUTHOR_UNAVAILABLE_CLASS)
            })
            .len();

        let toggles = self.surface.replace_content(&fragment);

        let summary = RenderSummary {
            articles: posts.len(),
            unattributed,
            toggles,
            failed,
        };
        tracing::info!(?summary, "feed rendered");
        summary
    }

    /// Refills the author select menu from `GET /users`, returning the number
    /// of options. The menu is left empty if the users cannot be fetched.
    pub async fn populate_users(&self) -> usize {
        let users = self.client.users().await.ok();

        let select = self.surface.select_menu();
        select.clear();
        builders::populate_select_menu(select, users.as_deref());
        select.children().len()
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, FetchError> {
        match self.source {
            PostSource::All => self.client.posts().await,
            PostSource::PerUser => {
                let users = self.client.users().await?;
                let per_user = join_all(
                    users
                        .iter()
                        .map(|user| self.client.user_posts(user.user_id())),
                )
                .await;

                // a user whose listing failed contributes no posts
                Ok(per_user.into_iter().flatten().flatten().collect())
            }
        }
    }
}

/// Keeps the first post for each id, so each id has at most one comment section.
fn dedup_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| {
            let fresh = seen.insert(post.id);
            if !fresh {
                tracing::warn!(post = post.id, "dropping duplicate post");
            }
            fresh
        })
        .collect()
}
