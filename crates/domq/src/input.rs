//! Factory input
//!
//! Every value `Dom::select` accepts is classified into an `Input` variant at
//! the call boundary; the normalizer then handles each variant exactly once.

use std::fmt;

use domq_dom::NodeId;

use crate::{Collection, Dom};

/// Callback queued until the document is ready
pub type ReadyCallback = Box<dyn FnOnce(&Dom)>;

/// Everything a collection can be built from
pub enum Input {
    /// Nothing; yields an empty collection
    Empty,
    /// Run once the document is ready
    Ready(ReadyCallback),
    /// A single node (element or document)
    Node(NodeId),
    /// The window singleton
    Window,
    /// An ordered list of nodes, copied as-is
    Nodes(Vec<NodeId>),
    /// Markup to parse into detached elements
    Markup(String),
    /// A selector resolved against the whole document
    Selector(String),
}

impl Input {
    /// Build a ready callback
    pub fn ready(callback: impl FnOnce(&Dom) + 'static) -> Self {
        Self::Ready(Box::new(callback))
    }

    /// Classify a string: empty, `document`, markup or selector.
    /// `body` stays a selector and is fast-tracked by the normalizer.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        if text == "document" {
            return Self::Node(NodeId::ROOT);
        }
        if is_markup(text) {
            return Self::Markup(text.to_string());
        }
        Self::Selector(text.to_string())
    }
}

/// `<...>` after trimming surrounding whitespace
pub fn is_markup(text: &str) -> bool {
    let text = text.trim();
    text.len() >= 2 && text.starts_with('<') && text.ends_with('>')
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Ready(_) => write!(f, "Ready(..)"),
            Self::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Self::Window => write!(f, "Window"),
            Self::Nodes(ids) => f.debug_tuple("Nodes").field(ids).finish(),
            Self::Markup(s) => f.debug_tuple("Markup").field(s).finish(),
            Self::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
        }
    }
}

impl From<()> for Input {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl From<&String> for Input {
    fn from(text: &String) -> Self {
        Self::from_text(text)
    }
}

impl From<NodeId> for Input {
    fn from(id: NodeId) -> Self {
        if id == NodeId::WINDOW {
            Self::Window
        } else if id == NodeId::NONE {
            Self::Empty
        } else {
            Self::Node(id)
        }
    }
}

impl From<Option<NodeId>> for Input {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Self::Empty, Self::from)
    }
}

impl From<Vec<NodeId>> for Input {
    fn from(ids: Vec<NodeId>) -> Self {
        Self::Nodes(ids)
    }
}

impl From<&[NodeId]> for Input {
    fn from(ids: &[NodeId]) -> Self {
        Self::Nodes(ids.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for Input {
    fn from(ids: [NodeId; N]) -> Self {
        Self::Nodes(ids.to_vec())
    }
}

impl From<&Collection> for Input {
    fn from(collection: &Collection) -> Self {
        Self::Nodes(collection.to_vec())
    }
}

impl From<Collection> for Input {
    fn from(collection: Collection) -> Self {
        Self::Nodes(collection.to_vec())
    }
}

/// What `is` compares each member against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// No criterion; every member is skipped
    None,
    /// Identity with this node
    Node(NodeId),
    /// A selector the member must match
    Selector(String),
}

impl From<&str> for Criterion {
    fn from(selector: &str) -> Self {
        if selector.is_empty() { Self::None } else { Self::Selector(selector.to_string()) }
    }
}

impl From<String> for Criterion {
    fn from(selector: String) -> Self {
        Self::from(selector.as_str())
    }
}

impl From<NodeId> for Criterion {
    fn from(id: NodeId) -> Self {
        if id == NodeId::NONE { Self::None } else { Self::Node(id) }
    }
}

impl From<Option<NodeId>> for Criterion {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Self::None, Self::from)
    }
}

impl From<()> for Criterion {
    fn from(_: ()) -> Self {
        Self::None
    }
}
