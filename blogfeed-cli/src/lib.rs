#![warn(clippy::use_self)]

//! Command line front end for rendering a blog feed to HTML.

pub mod config;
pub mod render;
pub mod shell;

mod util;

pub use self::shell::shell;

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
