use std::fmt;

use crate::node::Node;

pub trait EventKey {
    fn name(&self) -> &str;
}

impl EventKey for &str {
    fn name(&self) -> &str {
        self
    }
}

impl EventKey for String {
    fn name(&self) -> &str {
        self
    }
}

/// Handle returned when a listener is attached, used to detach it again.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dispatched event. Events do not propagate, so `target` is always the
/// node the listener was attached to.
#[derive(Clone, Debug)]
pub struct Event {
    name: String,
    target: Node,
}

impl Event {
    pub(crate) fn new(name: &str, target: Node) -> Self {
        Self {
            name: name.to_string(),
            target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Node {
        &self.target
    }
}
