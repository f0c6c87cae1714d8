use std::rc::Rc;

use super::node::Node;

/// An event listener. Errors stop the dispatch and are returned to the dispatcher.
pub type Listener = Rc<dyn Fn(&Event) -> anyhow::Result<()>>;

/// An event delivered to listeners.
#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    target: Option<Node>,
}

impl Event {
    /// Create an event of the given type, e.g. `"input"` or `"click"`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: None,
        }
    }

    /// The event type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> Option<&Node> {
        self.target.as_ref()
    }

    pub(crate) fn with_target(mut self, target: Node) -> Self {
        self.target = Some(target);
        self
    }
}
