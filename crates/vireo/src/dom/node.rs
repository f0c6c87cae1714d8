use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::event::{Event, Listener};

/// Elements that never have children or a closing tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &["input", "br", "img", "hr", "meta", "link"];

/// An attribute as it appears on an element, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, as written.
    pub name: String,
    /// Attribute value; empty for bare attributes.
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// An element with a tag, attributes and a value.
    Element,
    /// A text leaf.
    Text,
    /// An offscreen holder; appending it moves its children instead.
    Fragment,
}

enum NodeData {
    Element {
        tag: String,
        attributes: RefCell<Vec<Attribute>>,
        value: RefCell<String>,
    },
    Text(RefCell<String>),
    Fragment,
}

struct NodeInner {
    data: NodeData,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

/// A node of the host document.
///
/// Cheap to clone: clones are handles to the same node. Equality is identity.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl Node {
    fn with_data(data: NodeData) -> Self {
        Node(Rc::new(NodeInner {
            data,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    /// Create an element. The tag is lowercased.
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(Vec::new()),
            value: RefCell::new(String::new()),
        })
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(RefCell::new(content.into())))
    }

    /// Create an empty fragment.
    pub fn fragment() -> Self {
        Self::with_data(NodeData::Fragment)
    }

    /// The kind of this node.
    pub fn node_type(&self) -> NodeType {
        match self.0.data {
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Fragment => NodeType::Fragment,
        }
    }

    /// Returns true for elements.
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Returns true for text nodes.
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// The lowercased tag of an element.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Returns true if both handles are the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ---------------------------------------------------------------------
    // Tree
    // ---------------------------------------------------------------------

    /// Children in document order.
    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    /// Returns true if this node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.0.children.borrow().is_empty()
    }

    /// The first child, if any.
    pub fn first_child(&self) -> Option<Node> {
        self.0.children.borrow().first().cloned()
    }

    /// The parent, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    /// Returns true if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Append a child, detaching it from its current parent first.
    ///
    /// Appending a fragment moves all of its children, in order, and leaves it empty.
    /// Appending a node into its own subtree is ignored.
    pub fn append_child(&self, child: &Node) {
        if child.node_type() == NodeType::Fragment {
            let moved = std::mem::take(&mut *child.0.children.borrow_mut());
            for node in moved {
                *node.0.parent.borrow_mut() = Weak::new();
                self.append_child(&node);
            }
            return;
        }
        if child.contains(self) {
            return;
        }
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    /// Remove a direct child. Returns false if `child` is not a child of this node.
    pub fn remove_child(&self, child: &Node) -> bool {
        let mut children = self.0.children.borrow_mut();
        let Some(index) = children.iter().position(|c| c.ptr_eq(child)) else {
            return false;
        };
        children.remove(index);
        *child.0.parent.borrow_mut() = Weak::new();
        true
    }

    /// Detach this node from its parent, if any.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Move every child of this node into a new fragment, in order.
    pub fn take_children(&self) -> Node {
        let fragment = Node::fragment();
        while let Some(child) = self.first_child() {
            fragment.append_child(&child);
        }
        fragment
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Attributes in source order. Empty for non-elements.
    pub fn attributes(&self) -> Vec<Attribute> {
        match &self.0.data {
            NodeData::Element { attributes, .. } => attributes.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attributes, .. } => attributes
                .borrow()
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
            _ => None,
        }
    }

    /// Set an attribute, replacing an existing one of the same name in place.
    ///
    /// Setting `value` on an element also sets its current value.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let NodeData::Element {
            attributes,
            value: current,
            ..
        } = &self.0.data
        else {
            return;
        };
        let value = value.into();
        if name == "value" {
            *current.borrow_mut() = value.clone();
        }
        let mut attributes = attributes.borrow_mut();
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute::new(name, value)),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let NodeData::Element { attributes, .. } = &self.0.data else {
            return None;
        };
        let mut attributes = attributes.borrow_mut();
        let index = attributes.iter().position(|a| a.name == name)?;
        Some(attributes.remove(index).value)
    }

    // ---------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------

    /// Text of a text node, or the concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        match &self.0.data {
            NodeData::Text(text) => text.borrow().clone(),
            _ => {
                let mut out = String::new();
                for child in self.0.children.borrow().iter() {
                    out.push_str(&child.text_content());
                }
                out
            }
        }
    }

    /// Replace the text of a text node, or replace all children with one text node.
    pub fn set_text_content(&self, content: impl Into<String>) {
        let content = content.into();
        match &self.0.data {
            NodeData::Text(text) => *text.borrow_mut() = content,
            _ => {
                for child in self.0.children.borrow_mut().drain(..) {
                    *child.0.parent.borrow_mut() = Weak::new();
                }
                if !content.is_empty() {
                    self.append_child(&Node::text(content));
                }
            }
        }
    }

    /// Current value of an element (what a form control displays).
    pub fn value(&self) -> String {
        match &self.0.data {
            NodeData::Element { value, .. } => value.borrow().clone(),
            _ => String::new(),
        }
    }

    /// Set the current value of an element. Does not touch the `value` attribute.
    pub fn set_value(&self, content: impl Into<String>) {
        if let NodeData::Element { value, .. } = &self.0.data {
            *value.borrow_mut() = content.into();
        }
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Register a listener for an event type.
    pub fn add_event_listener(
        &self,
        kind: &str,
        listener: impl Fn(&Event) -> anyhow::Result<()> + 'static,
    ) {
        self.0
            .listeners
            .borrow_mut()
            .push((kind.to_string(), Rc::new(listener)));
    }

    /// Number of listeners registered for an event type.
    pub fn listener_count(&self, kind: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| k == kind)
            .count()
    }

    /// Remove every listener for an event type.
    pub fn remove_event_listeners(&self, kind: &str) {
        self.0.listeners.borrow_mut().retain(|(k, _)| k != kind);
    }

    /// Run the listeners for `event`, in registration order, on this node.
    ///
    /// The event's target is set to this node. Stops at the first listener error.
    pub fn dispatch_event(&self, event: Event) -> anyhow::Result<()> {
        let event = event.with_target(self.clone());
        let listeners: Vec<Listener> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| k == event.kind())
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&event)?;
        }
        Ok(())
    }

    /// Set the value as a user typing would, then fire `input`.
    pub fn simulate_input(&self, content: impl Into<String>) -> anyhow::Result<()> {
        self.set_value(content);
        self.dispatch_event(Event::new("input"))
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    /// Returns true if this element matches a simple selector: `#id`, `.class` or `tag`.
    pub fn matches(&self, selector: &str) -> bool {
        if !self.is_element() {
            return false;
        }
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            self.attribute("id").as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
        } else {
            self.tag_name()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(selector))
        }
    }

    /// First descendant, in document order, matching a simple selector.
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        for child in self.0.children.borrow().iter() {
            if child.matches(selector) {
                return Some(child.clone());
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    // ---------------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------------

    /// Markup of the children.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.0.children.borrow().iter() {
            child.write_html(&mut out);
        }
        out
    }

    /// Markup of this node, including itself.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.0.data {
            NodeData::Text(text) => escape_into(out, &text.borrow(), false),
            NodeData::Fragment => out.push_str(&self.inner_html()),
            NodeData::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(tag);
                for attribute in attributes.borrow().iter() {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    if !attribute.value.is_empty() {
                        out.push_str("=\"");
                        escape_into(out, &attribute.value, true);
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                out.push_str(&self.inner_html());
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { tag, .. } => write!(f, "<{tag}>"),
            NodeData::Text(text) => write!(f, "#text {:?}", text.borrow()),
            NodeData::Fragment => f.write_str("#fragment"),
        }
    }
}
