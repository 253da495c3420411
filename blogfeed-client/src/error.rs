use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The caller had no identifier to ask for. No request was made.
    #[error("no {0} id given")]
    MissingId(&'static str),

    // every `path` is service-relative, e.g. `/users/1`
    #[error("{path}: status code {status} not in 200 - 299 range")]
    Status { path: String, status: u16 },

    #[error("{path}: {message}")]
    Transport { path: String, message: String },

    #[error("{path}: response body is not the expected JSON")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request task failed")]
    Join(#[from] JoinError),
}

impl FetchError {
    pub fn is_missing_id(&self) -> bool {
        matches!(self, Self::MissingId(_))
    }
}
