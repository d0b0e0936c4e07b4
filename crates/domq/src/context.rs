//! The `Dom` context
//!
//! Owns the document, the scratch element, the resolved host strategies, the
//! listener registry and the ready queue. Cloning a `Dom` is cheap and every
//! clone refers to the same document.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use domq_css::query_selector_all;
use domq_dom::{Document, ListenerRegistry, NodeId, ReadyState};
use domq_html::{HtmlError, HtmlParser};

use crate::events::Handler;
use crate::input::ReadyCallback;
use crate::resolve::resolve;
use crate::strategy::{ClassStrategy, MatchStrategy};
use crate::{Collection, DomConfig, Input};

/// Shared handle to a document and its query state
#[derive(Clone)]
pub struct Dom {
    inner: Rc<Inner>,
}

struct Inner {
    document: RefCell<Document>,
    scratch: NodeId,
    match_strategy: MatchStrategy,
    class_strategy: ClassStrategy,
    listeners: RefCell<ListenerRegistry<Handler>>,
    ready: RefCell<ReadyQueue>,
}

#[derive(Default)]
struct ReadyQueue {
    fired: bool,
    pending: VecDeque<ReadyCallback>,
}

impl Dom {
    /// A context over an empty html/head/body document
    pub fn new() -> Self {
        Self::with_config(DomConfig::default())
    }

    /// A context over an empty document with custom configuration
    pub fn with_config(config: DomConfig) -> Self {
        let document = Document::new(&config.url);
        Self::from_document(document, config)
    }

    /// Parse a full HTML document
    pub fn parse(html: &str, config: DomConfig) -> Result<Self, HtmlError> {
        let document = HtmlParser::new().parse_with_url(html, &config.url)?;
        Ok(Self::from_document(document, config))
    }

    /// Wrap an existing document
    pub fn from_document(mut document: Document, config: DomConfig) -> Self {
        document.set_ready_state(config.ready_state);
        document.set_features(config.features);

        let scratch = document.tree.create_element("div");
        let match_strategy = MatchStrategy::resolve(document.features());
        let class_strategy = ClassStrategy::resolve(document.features());
        tracing::debug!(?match_strategy, ?class_strategy, url = document.url(), "Created DOM context");

        Self {
            inner: Rc::new(Inner {
                document: RefCell::new(document),
                scratch,
                match_strategy,
                class_strategy,
                listeners: RefCell::new(ListenerRegistry::new()),
                ready: RefCell::new(ReadyQueue::default()),
            }),
        }
    }

    /// Borrow the document.
    ///
    /// Release the borrow before calling back into collection operations.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    pub fn match_strategy(&self) -> MatchStrategy {
        self.inner.match_strategy
    }

    pub fn class_strategy(&self) -> ClassStrategy {
        self.inner.class_strategy
    }

    pub(crate) fn listeners(&self) -> RefMut<'_, ListenerRegistry<Handler>> {
        self.inner.listeners.borrow_mut()
    }

    /// Check whether two handles share a document
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Factory
    // ------------------------------------------------------------------

    /// Build a collection from any supported input
    pub fn select(&self, input: impl Into<Input>) -> Collection {
        let input = input.into();
        tracing::trace!(?input, "select");

        match input {
            Input::Empty => self.collection(Vec::new()),
            Input::Ready(callback) => {
                self.ready(callback);
                self.collection(vec![NodeId::ROOT])
            }
            Input::Window => self.collection(vec![NodeId::WINDOW]),
            Input::Node(id) => {
                let doc = self.document();
                let usable = id == NodeId::WINDOW
                    || doc.tree.get(id).is_some_and(|n| n.is_element() || n.is_document());
                drop(doc);
                self.collection(if usable { vec![id] } else { Vec::new() })
            }
            Input::Nodes(ids) => self.collection(ids),
            Input::Markup(markup) => {
                let nodes = self.fragment(&markup);
                self.collection(nodes)
            }
            Input::Selector(selector) => match selector.as_str() {
                "body" => {
                    let body = self.document().body();
                    self.collection(body.into_iter().collect())
                }
                "document" => self.collection(vec![NodeId::ROOT]),
                _ => {
                    let found = resolve(&self.document(), &[NodeId::ROOT], &selector);
                    self.collection(found)
                }
            },
        }
    }

    /// The empty collection
    pub fn empty(&self) -> Collection {
        self.collection(Vec::new())
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Collection {
        self.select("body")
    }

    /// The window singleton
    pub fn window(&self) -> Collection {
        self.select(Input::Window)
    }

    pub(crate) fn collection(&self, nodes: Vec<NodeId>) -> Collection {
        Collection::new(self.clone(), nodes)
    }

    // ------------------------------------------------------------------
    // Ready queue
    // ------------------------------------------------------------------

    fn ready(&self, callback: ReadyCallback) {
        if self.document().ready_state() != ReadyState::Loading {
            callback(self);
            return;
        }
        let mut queue = self.inner.ready.borrow_mut();
        queue.pending.push_back(callback);
        tracing::trace!(queued = queue.pending.len(), "Queued ready callback");
    }

    /// Deliver the one-shot "content loaded" signal.
    ///
    /// Marks the document interactive and runs the queued callbacks in
    /// registration order. Returns how many callbacks ran; later calls are
    /// no-ops returning 0.
    pub fn content_loaded(&self) -> usize {
        {
            let mut queue = self.inner.ready.borrow_mut();
            if queue.fired {
                return 0;
            }
            queue.fired = true;
        }

        {
            let mut doc = self.document_mut();
            if doc.ready_state() == ReadyState::Loading {
                doc.set_ready_state(ReadyState::Interactive);
            }
        }

        let mut ran = 0;
        loop {
            let next = self.inner.ready.borrow_mut().pending.pop_front();
            let Some(callback) = next else {
                break;
            };
            callback(self);
            ran += 1;
        }
        tracing::debug!(ran, "Document ready");
        ran
    }

    // ------------------------------------------------------------------
    // Scratch element
    // ------------------------------------------------------------------

    /// Acquire the scratch element; it is emptied again when the guard drops
    pub fn scratch(&self) -> ScratchGuard<'_> {
        ScratchGuard { dom: self, id: self.inner.scratch }
    }

    /// Parse markup into detached elements, in document order
    pub(crate) fn fragment(&self, markup: &str) -> Vec<NodeId> {
        let scratch = self.scratch();
        let mut doc = self.document_mut();
        if let Err(err) = domq_html::parse_fragment(markup, &mut doc.tree, scratch.id()) {
            tracing::debug!(%err, "Fragment parsing failed");
            return Vec::new();
        }
        let elements: Vec<NodeId> = doc.tree.element_children(scratch.id()).collect();
        tracing::trace!(elements = elements.len(), "Parsed fragment");
        elements
    }

    /// Parse markup and move every resulting node into `parent`, before
    /// `reference` (or at the end)
    pub(crate) fn parse_into(&self, markup: &str, parent: NodeId, reference: Option<NodeId>) -> Vec<NodeId> {
        let scratch = self.scratch();
        let mut doc = self.document_mut();
        if let Err(err) = domq_html::parse_fragment(markup, &mut doc.tree, scratch.id()) {
            tracing::debug!(%err, "Fragment parsing failed");
            return Vec::new();
        }
        let nodes: Vec<NodeId> = doc.tree.children(scratch.id()).map(|(id, _)| id).collect();
        for &node in &nodes {
            if let Err(err) = doc.tree.insert_before(parent, node, reference) {
                tracing::debug!(%parent, %err, "Could not move parsed node");
            }
        }
        nodes
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    /// Does `element` match `selector`? Invalid selectors never match.
    pub fn matches(&self, element: NodeId, selector: &str) -> bool {
        match self.inner.match_strategy {
            MatchStrategy::Native(api) => {
                let doc = self.document();
                match domq_css::matches_selector(&doc.tree, element, selector) {
                    Ok(matched) => matched,
                    Err(err) => {
                        tracing::debug!(selector, api = api.name(), %err, "Selector rejected");
                        false
                    }
                }
            }
            MatchStrategy::Reinsertion => self.matches_by_reinsertion(element, selector),
        }
    }

    /// Query the element's parent and look for the element among the results,
    /// parking a detached element in the scratch element for the duration.
    fn matches_by_reinsertion(&self, element: NodeId, selector: &str) -> bool {
        let parent = {
            let doc = self.document();
            if !doc.tree.is_element(element) {
                return false;
            }
            doc.tree.parent(element)
        };

        let scratch;
        let root = match parent {
            Some(parent) => parent,
            None => {
                scratch = self.scratch();
                if let Err(err) = self.document_mut().tree.append_child(scratch.id(), element) {
                    tracing::debug!(%element, %err, "Could not park element in scratch");
                    return false;
                }
                scratch.id()
            }
        };

        let found = query_selector_all(&self.document().tree, root, selector);
        match found {
            Ok(nodes) => nodes.contains(&element),
            Err(err) => {
                tracing::debug!(selector, %err, "Selector rejected");
                false
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("match_strategy", &self.inner.match_strategy)
            .field("class_strategy", &self.inner.class_strategy)
            .finish_non_exhaustive()
    }
}

/// Scoped access to the scratch element
pub struct ScratchGuard<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl ScratchGuard<'_> {
    /// The scratch element
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        match self.dom.inner.document.try_borrow_mut() {
            Ok(mut doc) => {
                doc.tree.remove_children(self.id);
            }
            Err(_) => tracing::warn!("Scratch element still borrowed; left uncleared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_scratch_is_emptied_on_drop() {
        let dom = Dom::new();
        let id = {
            let scratch = dom.scratch();
            let mut doc = dom.document_mut();
            let span = doc.tree.create_element("span");
            doc.tree.append_child(scratch.id(), span).unwrap();
            assert_eq!(doc.tree.children(scratch.id()).count(), 1);
            scratch.id()
        };
        assert_eq!(dom.document().tree.children(id).count(), 0);
    }

    #[test]
    fn test_fragment_returns_detached_elements() {
        let dom = Dom::new();
        let nodes = dom.fragment("<b>1</b> text <i>2</i>");
        assert_eq!(nodes.len(), 2);
        let doc = dom.document();
        assert!(nodes.iter().all(|&n| doc.tree.parent(n).is_none()));
        assert_eq!(doc.tree.tag_name(nodes[1]), Some("i"));
    }

    #[test]
    fn test_ready_queue_runs_in_order_once() {
        let dom = Dom::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            dom.select(Input::ready(move |_| log.borrow_mut().push(i)));
        }
        assert!(log.borrow().is_empty());

        assert_eq!(dom.content_loaded(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(dom.document().ready_state(), ReadyState::Interactive);
        assert_eq!(dom.content_loaded(), 0);

        let late = Rc::new(Cell::new(false));
        let flag = late.clone();
        dom.select(Input::ready(move |_| flag.set(true)));
        assert!(late.get());
    }

    #[test]
    fn test_ready_callback_registered_while_draining_runs_immediately() {
        let dom = Dom::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let outer = log.clone();
        dom.select(Input::ready(move |dom: &Dom| {
            outer.borrow_mut().push("outer");
            let inner = outer.clone();
            dom.select(Input::ready(move |_| inner.borrow_mut().push("inner")));
            outer.borrow_mut().push("after");
        }));
        assert_eq!(dom.content_loaded(), 1);
        assert_eq!(*log.borrow(), vec!["outer", "inner", "after"]);
    }

    #[test]
    fn test_ready_collection_wraps_document() {
        let dom = Dom::new();
        let collection = dom.select(Input::ready(|_| {}));
        assert_eq!(collection.to_vec(), vec![NodeId::ROOT]);
    }

    #[test]
    fn test_reinsertion_leaves_detached_element_detached() {
        let dom = Dom::with_config(DomConfig::bare());
        let nodes = dom.fragment("<p class=\"x\"></p>");
        let p = nodes[0];

        assert!(dom.matches(p, "p.x"));
        assert!(dom.matches(p, "div > p"));
        assert!(!dom.matches(p, "span"));
        assert!(!dom.matches(p, "<bad>"));
        assert_eq!(dom.document().tree.parent(p), None);
    }

    #[test]
    fn test_native_matching() {
        let dom = Dom::new();
        let p = dom.fragment("<p class=\"x\"></p>")[0];
        assert!(dom.matches(p, ".x"));
        assert!(!dom.matches(p, "div > p"));
        assert!(!dom.matches(NodeId::ROOT, "*"));
    }
}
