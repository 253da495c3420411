use serde::de::DeserializeOwned;

use crate::{
    model::{Comment, Post, PostId, User, UserId},
    transport::{HttpOptions, HttpTransport, Transport},
    FetchError,
};

/// Typed queries over a [`Transport`].
///
/// Every query either returns the decoded records or a [`FetchError`]. Remote
/// failures are logged here, once, so callers only decide how to degrade.
/// Queries that need an id take `Option` and return
/// [`FetchError::MissingId`] without touching the transport when given `None`.
#[derive(Clone, Debug)]
pub struct Client<T = HttpTransport> {
    transport: T,
}

impl Client<HttpTransport> {
    pub fn http(options: &HttpOptions) -> Self {
        Self::new(HttpTransport::new(options))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn users(&self) -> Result<Vec<User>, FetchError> {
        self.fetch("/users").await
    }

    pub async fn posts(&self) -> Result<Vec<Post>, FetchError> {
        self.fetch("/posts").await
    }

    pub async fn user_posts(&self, user_id: Option<UserId>) -> Result<Vec<Post>, FetchError> {
        let Some(user_id) = user_id else {
            return Err(FetchError::MissingId("user"));
        };
        self.fetch(&format!("/posts?userId={user_id}")).await
    }

    pub async fn user(&self, user_id: Option<UserId>) -> Result<User, FetchError> {
        let Some(user_id) = user_id else {
            return Err(FetchError::MissingId("user"));
        };
        self.fetch(&format!("/users/{user_id}")).await
    }

    pub async fn post_comments(&self, post_id: Option<PostId>) -> Result<Vec<Comment>, FetchError> {
        let Some(post_id) = post_id else {
            return Err(FetchError::MissingId("post"));
        };
        self.fetch(&format!("/posts/{post_id}/comments")).await
    }

    async fn fetch<D: DeserializeOwned>(&self, path: &str) -> Result<D, FetchError> {
        tracing::debug!(path, "fetching");

        let result = match self.transport.get(path).await {
            Ok(body) => serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                path: path.to_string(),
                source,
            }),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            tracing::warn!(path, error = %err, "fetch failed");
        }
        result
    }
}
