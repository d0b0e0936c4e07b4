//! domq DOM - Document Object Model
//!
//! Arena-based DOM tree consumed by the domq collection engine: node storage,
//! tree mutation, attribute/class/style access, events, geometry and the
//! document-level host state (ready state, capabilities, layout boxes).

mod attributes;
mod classlist;
mod document;
mod events;
mod geometry;
mod host;
mod node;
mod operations;
mod property;
mod style;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::Document;
pub use events::{Event, ListenerRegistry, event_path};
pub use geometry::DOMRect;
pub use host::{HostFeatures, MatchesApi, ReadyState};
pub use node::{ElementData, Node, NodeData, NodeType};
pub use operations::{DomError, DomResult};
pub use property::PropValue;
pub use style::{CssStyleDeclaration, Declaration, to_kebab_case};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// The window singleton. It has no tree node but can hold listeners.
    pub const WINDOW: NodeId = NodeId(u32::MAX - 1);

    /// Check if this ID refers to a tree node
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 < Self::WINDOW.0
    }

    /// Convert a link into an `Option`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::NONE => write!(f, "#none"),
            Self::WINDOW => write!(f, "#window"),
            NodeId(n) => write!(f, "#{}", n),
        }
    }
}
