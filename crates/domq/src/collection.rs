//! Collections of nodes
//!
//! A `Collection` is an ordered list of node references bound to a `Dom`.
//! Membership never changes after construction: traversal returns new
//! collections, while content operations mutate the referenced nodes and
//! return the receiver.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use domq_dom::NodeId;

use crate::resolve::resolve;
use crate::{Criterion, Dom};

/// An ordered selection of nodes
#[derive(Clone)]
pub struct Collection {
    dom: Dom,
    nodes: Vec<NodeId>,
}

impl Collection {
    pub(crate) fn new(dom: Dom, nodes: Vec<NodeId>) -> Self {
        Self { dom, nodes }
    }

    /// The context this collection belongs to
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    fn wrap(&self, nodes: Vec<NodeId>) -> Self {
        Self::new(self.dom.clone(), nodes)
    }

    // ------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }

    /// Member at `index`; negative indices count from the end
    pub fn get(&self, index: isize) -> Option<NodeId> {
        let index = if index < 0 {
            self.nodes.len().checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };
        self.nodes.get(index).copied()
    }

    /// Collection holding only the member at `index`
    pub fn eq(&self, index: isize) -> Self {
        self.wrap(self.get(index).into_iter().collect())
    }

    pub fn first(&self) -> Self {
        self.eq(0)
    }

    pub fn last(&self) -> Self {
        self.eq(-1)
    }

    /// Sub-collection over a range of positions, clamped to the length
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let len = self.nodes.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let end = end.min(len);
        let start = start.min(end);
        self.wrap(self.nodes[start..end].to_vec())
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// Call `f` with every member and its position
    pub fn each(&self, mut f: impl FnMut(NodeId, usize)) -> &Self {
        for (i, &node) in self.nodes.iter().enumerate() {
            f(node, i);
        }
        self
    }

    /// Collect whatever `f` returns for each member
    pub fn map(&self, mut f: impl FnMut(NodeId, usize) -> Option<NodeId>) -> Self {
        let nodes = self.nodes.iter().enumerate().filter_map(|(i, &node)| f(node, i)).collect();
        self.wrap(nodes)
    }

    pub fn filter(&self, mut f: impl FnMut(NodeId, usize) -> bool) -> Self {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter(|&(i, &node)| f(node, i))
            .map(|(_, &node)| node)
            .collect();
        self.wrap(nodes)
    }

    /// Members matching `selector`
    pub fn filter_selector(&self, selector: &str) -> Self {
        self.filter(|node, _| self.dom.matches(node, selector))
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Descendants of every member that match `selector`, in member order.
    ///
    /// An empty collection searches the whole document.
    pub fn find(&self, selector: &str) -> Self {
        if selector.is_empty() {
            return self.wrap(Vec::new());
        }
        let found = {
            let doc = self.dom.document();
            if self.nodes.is_empty() {
                resolve(&doc, &[NodeId::ROOT], selector)
            } else {
                resolve(&doc, &self.nodes, selector)
            }
        };
        self.wrap(found)
    }

    /// Element children of every member
    pub fn children(&self, selector: Option<&str>) -> Self {
        let children: Vec<NodeId> = {
            let doc = self.dom.document();
            let tree = &doc.tree;
            self.nodes.iter().flat_map(|&node| tree.element_children(node)).collect()
        };
        self.filtered(children, selector)
    }

    /// Element parent of every member
    pub fn parent(&self, selector: Option<&str>) -> Self {
        self.related(selector, |tree, node| tree.parent(node).filter(|&p| tree.is_element(p)))
    }

    /// Previous element sibling of every member
    pub fn prev(&self, selector: Option<&str>) -> Self {
        self.related(selector, |tree, node| tree.prev_element_sibling(node))
    }

    /// Next element sibling of every member
    pub fn next(&self, selector: Option<&str>) -> Self {
        self.related(selector, |tree, node| tree.next_element_sibling(node))
    }

    fn related(
        &self,
        selector: Option<&str>,
        step: impl Fn(&domq_dom::DomTree, NodeId) -> Option<NodeId>,
    ) -> Self {
        let related: Vec<NodeId> = {
            let doc = self.dom.document();
            self.nodes.iter().filter_map(|&node| step(&doc.tree, node)).collect()
        };
        self.filtered(related, selector)
    }

    fn filtered(&self, nodes: Vec<NodeId>, selector: Option<&str>) -> Self {
        match selector {
            Some(selector) => {
                let nodes = nodes.into_iter().filter(|&n| self.dom.matches(n, selector)).collect();
                self.wrap(nodes)
            }
            None => self.wrap(nodes),
        }
    }

    /// Nearest inclusive ancestor of the first member matching `selector`.
    /// The walk stops before `<body>`.
    pub fn closest(&self, selector: &str) -> Self {
        let Some(start) = self.nodes.first().copied() else {
            return self.wrap(Vec::new());
        };
        let body = self.dom.document().body();

        let mut current = Some(start);
        while let Some(node) = current {
            if Some(node) == body {
                break;
            }
            if self.dom.matches(node, selector) {
                return self.wrap(vec![node]);
            }
            current = self.dom.document().tree.parent(node);
        }
        self.wrap(Vec::new())
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// Does any member satisfy `criterion`?
    pub fn is(&self, criterion: impl Into<Criterion>) -> bool {
        let criterion = criterion.into();
        self.nodes.iter().any(|&node| match &criterion {
            Criterion::None => false,
            Criterion::Node(other) => node == *other,
            Criterion::Selector(selector) => self.dom.matches(node, selector),
        })
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.dom.ptr_eq(&other.dom) && self.nodes == other.nodes
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
