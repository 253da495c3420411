//! In-memory [`Transport`] with canned replies, optional per-path delays, and a
//! request log.

use std::{cell::RefCell, collections::HashMap, time::Duration};

use serde::Serialize;

use crate::{FetchError, Transport};

#[derive(Clone, Debug)]
enum Reply {
    Body(String),
    Status(u16),
}

#[derive(Clone, Debug)]
struct Route {
    reply: Reply,
    delay: Duration,
}

#[derive(Default, Debug)]
pub struct StaticTransport {
    routes: HashMap<String, Route>,
    requests: RefCell<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json<S: Serialize + ?Sized>(self, path: &str, value: &S) -> Self {
        let body = serde_json::to_string(value).expect("fixture must serialize");
        self.body(path, body)
    }

    pub fn body(mut self, path: &str, body: impl Into<String>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                reply: Reply::Body(body.into()),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                reply: Reply::Status(status),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Delays the reply for an already registered `path`.
    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.routes
            .get_mut(path)
            .unwrap_or_else(|| panic!("no route registered for `{path}`"))
            .delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for StaticTransport {
    async fn get(&self, path: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(path.to_string());

        // unknown paths behave like the real service
        let Some(route) = self.routes.get(path).cloned() else {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            });
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(FetchError::Status {
                path: path.to_string(),
                status,
            }),
        }
    }
}
