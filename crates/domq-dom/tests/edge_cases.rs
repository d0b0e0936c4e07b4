//! Edge case and stress tests for domq-dom
//!
//! Deep and wide trees, empty documents and malformed inline styles.

use domq_dom::{CssStyleDeclaration, DOMTokenList, Document, DomError, DomTree, NodeId};

// ============================================================================
// DOM TREE EDGE CASES
// ============================================================================

#[test]
fn test_tree_empty_operations() {
    let tree = DomTree::new();

    assert!(tree.get(NodeId::NONE).is_none());
    assert!(tree.get(NodeId::WINDOW).is_none());
    assert_eq!(tree.children(NodeId::NONE).count(), 0);
    assert_eq!(tree.descendants(tree.root()).count(), 0);
}

#[test]
fn test_tree_single_node() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_child(tree.root(), div).unwrap();

    let node = tree.get(div).unwrap();
    assert!(!node.first_child.is_valid());
    assert!(!node.last_child.is_valid());
    assert!(!node.next_sibling.is_valid());
    assert!(!node.prev_sibling.is_valid());
}

#[test]
fn test_tree_deep_nesting() {
    let mut tree = DomTree::new();

    let mut parent = tree.root();
    for _ in 0..100 {
        let child = tree.create_element("div");
        tree.append_child(parent, child).unwrap();
        parent = child;
    }

    let text = tree.create_text("Deep content");
    tree.append_child(parent, text).unwrap();

    assert_eq!(tree.len(), 102); // root + 100 divs + text
    assert_eq!(tree.ancestors(text).count(), 101);
    assert_eq!(tree.text_content(tree.root()), "Deep content");
}

#[test]
fn test_tree_wide_tree() {
    let mut tree = DomTree::new();

    let parent = tree.create_element("ul");
    tree.append_child(tree.root(), parent).unwrap();

    for _ in 0..1000 {
        let li = tree.create_element("li");
        tree.append_child(parent, li).unwrap();
    }

    assert_eq!(tree.children(parent).count(), 1000);

    let parent_node = tree.get(parent).unwrap();
    assert!(parent_node.first_child.is_valid());
    assert!(parent_node.last_child.is_valid());
    assert_ne!(parent_node.first_child, parent_node.last_child);
}

#[test]
fn test_tree_remove_all_children() {
    let mut tree = DomTree::new();

    let parent = tree.create_element("div");
    tree.append_child(tree.root(), parent).unwrap();

    for _ in 0..5 {
        let child = tree.create_element("p");
        tree.append_child(parent, child).unwrap();
    }

    let removed = tree.remove_children(parent);
    assert_eq!(removed.len(), 5);

    let parent_node = tree.get(parent).unwrap();
    assert!(!parent_node.first_child.is_valid());
    assert!(!parent_node.last_child.is_valid());
    assert!(removed.iter().all(|&c| tree.parent(c).is_none()));
}

#[test]
fn test_tree_remove_middle_child() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let a = tree.create_element("p");
    let b = tree.create_element("p");
    let c = tree.create_element("p");
    for n in [a, b, c] {
        tree.append_child(parent, n).unwrap();
    }

    tree.detach(b);
    tree.detach(b); // detaching twice is harmless

    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_clone_of_document_is_rejected() {
    let mut tree = DomTree::new();
    assert_eq!(tree.clone_node(NodeId::ROOT, true), Err(DomError::InvalidNodeType(NodeId::ROOT)));
    assert_eq!(tree.clone_node(NodeId::NONE, true), Err(DomError::NotFound(NodeId::NONE)));
}

#[test]
fn test_text_node_cannot_be_parent() {
    let mut tree = DomTree::new();
    let text = tree.create_text("leaf");
    let span = tree.create_element("span");
    assert_eq!(tree.append_child(text, span), Err(DomError::InvalidNodeType(text)));
}

// ============================================================================
// TOKEN LIST / STYLE EDGE CASES
// ============================================================================

#[test]
fn test_token_list_unicode_tokens() {
    let list = DOMTokenList::from_string("世界 🚀 Ñoño");
    assert_eq!(list.len(), 3);
    assert!(list.contains("🚀"));
}

#[test]
fn test_style_without_values_is_empty() {
    let style = CssStyleDeclaration::parse(";;: ;color:;");
    assert!(style.is_empty());
    assert_eq!(style.css_text(), "");
}

#[test]
fn test_empty_style_removes_attribute() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    doc.tree.element_mut(body).unwrap().set_attr("style", "color: red");

    let mut style = doc.style(body);
    style.remove_property("color");
    doc.set_style(body, &style);
    assert!(!doc.tree.element(body).unwrap().has_attr("style"));
}
