//! Document - High-level document API
//!
//! Owns the tree plus the host-side state that is not part of any node:
//! ready state, advertised capabilities, layout boxes and scroll offsets.

use std::collections::HashMap;

use crate::{
    CssStyleDeclaration, DOMRect, DOMTokenList, DomTree, HostFeatures, NodeId, ReadyState,
};

/// Properties that inherit from the parent when not set on the element
const INHERITED_PROPERTIES: &[&str] = &[
    "color", "cursor", "direction", "font", "font-family", "font-size", "font-style",
    "font-variant", "font-weight", "letter-spacing", "line-height", "list-style",
    "list-style-type", "text-align", "text-indent", "text-transform", "visibility",
    "white-space", "word-spacing",
];

/// Elements whose UA default `display` is `block`
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "html", "main", "nav", "ol", "p", "pre", "section", "ul",
];

/// Elements that are never rendered
const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "link", "meta", "script", "style", "template", "title",
];

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    ready_state: ReadyState,
    features: HostFeatures,
    layout: HashMap<NodeId, DOMRect>,
    page_offset: (f64, f64),
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut document = Self::empty(url);
        let tree = &mut document.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.link(tree.root(), html, None);
        tree.link(html, head, None);
        tree.link(html, body, None);
        document
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            features: HostFeatures::default(),
            layout: HashMap::new(),
            page_offset: (0.0, 0.0),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `<html>` child of the document, looked up on every call so it
    /// follows removals and replacements
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree
            .element_children(self.tree.root())
            .find(|&id| self.tree.tag_name(id) == Some("html"))
    }

    fn html_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree.element_children(html).find(|&id| self.tree.tag_name(id) == Some(tag))
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.html_child("head")
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.html_child("body")
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn features(&self) -> &HostFeatures {
        &self.features
    }

    pub fn set_features(&mut self, features: HostFeatures) {
        self.features = features;
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Get element by ID anywhere in the document
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_by_id(self.tree.root(), id)
    }

    /// First descendant of `scope` (document order) whose id is `id`
    pub fn find_element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(scope)
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// Descendants of `scope` carrying every class in the space-separated `names`
    pub fn get_elements_by_class_name(&self, scope: NodeId, names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = names.split_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.tree
            .descendants(scope)
            .filter(|&n| {
                self.tree
                    .element(n)
                    .is_some_and(|e| wanted.iter().all(|w| e.has_class(w)))
            })
            .collect()
    }

    /// Descendants of `scope` with the given tag name (`*` matches all elements)
    pub fn get_elements_by_tag_name(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.tree
            .descendants(scope)
            .filter(|&n| {
                self.tree
                    .tag_name(n)
                    .is_some_and(|t| tag == "*" || t.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Classes and styles
    // ------------------------------------------------------------------

    /// Snapshot of an element's class list
    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        self.tree
            .element(id)
            .and_then(|e| e.get_attr("class"))
            .map(DOMTokenList::from_string)
            .unwrap_or_default()
    }

    /// Write a class list back to the `class` attribute
    pub fn set_class_list(&mut self, id: NodeId, list: &DOMTokenList) {
        if let Some(elem) = self.tree.element_mut(id) {
            elem.set_attr("class", &list.value());
        }
    }

    /// Parsed inline style of an element
    pub fn style(&self, id: NodeId) -> CssStyleDeclaration {
        self.tree
            .element(id)
            .and_then(|e| e.get_attr("style"))
            .map(CssStyleDeclaration::parse)
            .unwrap_or_default()
    }

    /// Write an inline style back to the `style` attribute
    pub fn set_style(&mut self, id: NodeId, style: &CssStyleDeclaration) {
        if let Some(elem) = self.tree.element_mut(id) {
            if style.is_empty() {
                elem.remove_attr("style");
            } else {
                elem.set_attr("style", &style.css_text());
            }
        }
    }

    /// Resolved value of a style property: inline, inherited, then UA default
    pub fn computed_style(&self, id: NodeId, property: &str) -> Option<String> {
        let property = crate::to_kebab_case(property);
        let tag = self.tree.tag_name(id)?;

        if let Some(value) = self.style(id).get_property_value(&property) {
            return Some(value.to_string());
        }

        if INHERITED_PROPERTIES.contains(&property.as_str()) {
            return self
                .tree
                .ancestors(id)
                .find_map(|a| self.style(a).get_property_value(&property).map(str::to_string));
        }

        match property.as_str() {
            "display" if HIDDEN_ELEMENTS.contains(&tag) => Some("none".to_string()),
            "display" if BLOCK_ELEMENTS.contains(&tag) => Some("block".to_string()),
            "display" if tag == "li" => Some("list-item".to_string()),
            "display" => Some("inline".to_string()),
            "position" => Some("static".to_string()),
            "float" => Some("none".to_string()),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Record the border box the host laid an element out at
    pub fn set_layout_box(&mut self, id: NodeId, rect: DOMRect) {
        self.layout.insert(id, rect);
    }

    /// `getBoundingClientRect()`; a zero rect when no box was recorded
    pub fn bounding_client_rect(&self, id: NodeId) -> DOMRect {
        self.layout.get(&id).copied().unwrap_or_default()
    }

    /// `(window.pageXOffset, window.pageYOffset)`
    pub fn page_offset(&self) -> (f64, f64) {
        self.page_offset
    }

    /// Scroll the window
    pub fn set_page_offset(&mut self, x: f64, y: f64) {
        self.page_offset = (x, y);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(children: &[(&str, &str)]) -> (Document, Vec<NodeId>) {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let mut ids = Vec::new();
        for (tag, class) in children {
            let id = doc.tree.create_element(tag);
            doc.tree.element_mut(id).unwrap().set_attr("class", class);
            doc.tree.append_child(body, id).unwrap();
            ids.push(id);
        }
        (doc, ids)
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree.parent(doc.head().unwrap()), Some(html));
        assert_eq!(doc.tree.parent(doc.body().unwrap()), Some(html));
        assert_eq!(doc.url(), "https://example.com/");
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_body_follows_the_tree() {
        let mut doc = Document::default();
        let old = doc.body().unwrap();
        let html = doc.document_element().unwrap();
        doc.tree.remove_child(html, old).unwrap();
        assert_eq!(doc.body(), None);

        let replacement = doc.tree.create_element("body");
        doc.tree.append_child(html, replacement).unwrap();
        assert_eq!(doc.body(), Some(replacement));
    }

    #[test]
    fn test_empty_document_has_no_body() {
        let doc = Document::empty("about:blank");
        assert_eq!(doc.body(), None);
    }

    #[test]
    fn test_lookups() {
        let (mut doc, ids) = doc_with(&[("div", "foo bar"), ("span", "foo"), ("div", "baz")]);
        doc.tree.element_mut(ids[2]).unwrap().set_attr("id", "third");

        let root = doc.tree.root();
        assert_eq!(doc.get_elements_by_class_name(root, "foo"), vec![ids[0], ids[1]]);
        assert_eq!(doc.get_elements_by_class_name(root, "bar foo"), vec![ids[0]]);
        assert!(doc.get_elements_by_class_name(root, "  ").is_empty());
        assert_eq!(doc.get_elements_by_tag_name(root, "DIV"), vec![ids[0], ids[2]]);
        assert_eq!(doc.get_element_by_id("third"), Some(ids[2]));
        assert_eq!(doc.find_element_by_id(ids[0], "third"), None);
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_class_list_roundtrip() {
        let (mut doc, ids) = doc_with(&[("div", "a")]);
        let mut list = doc.class_list(ids[0]);
        list.add("b");
        list.add("a");
        doc.set_class_list(ids[0], &list);
        assert_eq!(doc.tree.element(ids[0]).unwrap().get_attr("class"), Some("a b"));
    }

    #[test]
    fn test_computed_style() {
        let (mut doc, ids) = doc_with(&[("div", ""), ("span", "")]);
        let body = doc.body().unwrap();
        let mut style = CssStyleDeclaration::new();
        style.set_property("color", "red");
        doc.set_style(body, &style);

        assert_eq!(doc.computed_style(ids[0], "display").as_deref(), Some("block"));
        assert_eq!(doc.computed_style(ids[1], "display").as_deref(), Some("inline"));
        assert_eq!(doc.computed_style(ids[1], "color").as_deref(), Some("red"));
        assert_eq!(doc.computed_style(ids[1], "foo-bar"), None);
        assert_eq!(doc.computed_style(NodeId::ROOT, "display"), None);
    }

    #[test]
    fn test_layout_boxes() {
        let (mut doc, ids) = doc_with(&[("div", "")]);
        assert_eq!(doc.bounding_client_rect(ids[0]), DOMRect::new());
        doc.set_layout_box(ids[0], DOMRect::from_xywh(1.0, 2.0, 3.0, 4.0));
        doc.set_page_offset(0.0, 15.0);
        assert_eq!(doc.bounding_client_rect(ids[0]).top(), 2.0);
        assert_eq!(doc.page_offset(), (0.0, 15.0));
    }
}
