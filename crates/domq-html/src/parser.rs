//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts it into the arena tree.
//! Fragments are parsed in body context: the markup is fed as the content of
//! a `<body>` and the body's children are moved into the requested parent.

use domq_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = Self::read(html)?;

        let mut document = Document::empty(url);
        for child in dom.document.children.borrow().iter() {
            self.convert_node(child, document.tree_mut(), NodeId::ROOT)?;
        }

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse a body-context fragment and append the resulting nodes to
    /// `parent`, returning the top-level nodes in order.
    pub fn parse_fragment(&self, html: &str, tree: &mut DomTree, parent: NodeId) -> Result<Vec<NodeId>, HtmlError> {
        let dom = Self::read(&format!("<body>{}", html))?;

        let mut created = Vec::new();
        if let Some(body) = find_body(&dom.document) {
            for child in body.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, tree, parent)? {
                    created.push(id);
                }
            }
        }

        tracing::trace!(nodes = created.len(), "Parsed fragment");
        Ok(created)
    }

    fn read(html: &str) -> Result<RcDom, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node (and its subtree) and append it to `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
                return Ok(None);
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                tree.create_doctype(name, public_id, system_id)
            }
            RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
                id
            }
            RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };

        tree.append_child(parent, id)?;
        Ok(Some(id))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The `<body>` element of a parsed RcDom document
fn find_body(document: &Handle) -> Option<Handle> {
    let is_element = |handle: &Handle, tag: &str| {
        matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
    };
    let html = document
        .children
        .borrow()
        .iter()
        .find(|h| is_element(*h, "html"))
        .cloned()?;
    html.children.borrow().iter().find(|h| is_element(*h, "body")).cloned()
}
