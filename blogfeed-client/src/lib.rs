#![warn(clippy::use_self)]

//! Read-only client for the users/posts/comments REST service.

mod client;
mod error;
mod model;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use self::{
    client::Client,
    error::FetchError,
    model::{Comment, Company, ParseIdError, Post, PostId, User, UserId},
    transport::{HttpOptions, HttpTransport, Transport, DEFAULT_BASE_URL},
};
