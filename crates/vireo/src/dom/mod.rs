//! A small in-memory document: the node tree views are compiled against.
//!
//! Nodes are shared handles with parent links, attribute lists, a current value for
//! form-like elements, and per-type event listeners. [`parse`] builds a tree from markup.

mod event;
mod node;
mod parse;

pub use event::{Event, Listener};
pub use node::{Attribute, Node, NodeType};
pub use parse::parse;
