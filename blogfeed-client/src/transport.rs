use std::{future::Future, time::Duration};

use tokio::task;

use crate::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Fetches the raw body behind a service-relative path such as `/users/1`.
pub trait Transport {
    fn get(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("blogfeed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blocking `ureq` requests, each moved onto tokio's blocking pool so the
/// calling task only suspends.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(options: &HttpOptions) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(options.timeout)
            .user_agent(&options.user_agent)
            .build();
        Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path);
        let path = path.to_string();
        let agent = self.agent.clone();

        task::spawn_blocking(move || match agent.get(&url).call() {
            Ok(response) => response
                .into_string()
                .map_err(|err| FetchError::Transport {
                    path,
                    message: err.to_string(),
                }),
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status { path, status }),
            Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
                path,
                message: transport_message(&transport),
            }),
        })
        .await?
    }
}

/// ureq's own `Display` repeats the URL, which the error already names by path.
fn transport_message(transport: &ureq::Transport) -> String {
    match transport.message() {
        Some(message) => format!("{}: {message}", transport.kind()),
        None => transport.kind().to_string(),
    }
}
