#![warn(clippy::use_self)]

//! A small in-memory document tree.
//!
//! Nodes follow DOM semantics closely enough for building detached fragments,
//! moving them into a live container, flipping classes and text, and
//! dispatching synthetic events to registered listeners.

extern crate self as blogfeed_dom;

pub mod attrs;
pub mod events;

mod macros;
mod node;

pub use node::*;
