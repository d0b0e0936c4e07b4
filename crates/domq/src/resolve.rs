//! Selector resolution
//!
//! The three commonest selector shapes go to the dedicated lookups; anything
//! else goes to the general query engine.

use domq_css::{SelectorError, query_selector_all};
use domq_dom::{Document, NodeId};

/// Which lookup a selector is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind<'a> {
    /// `#token`
    Id(&'a str),
    /// `.token`
    Class(&'a str),
    /// A bare lowercase tag name
    Tag(&'a str),
    /// Everything else
    General(&'a str),
}

impl<'a> SelectorKind<'a> {
    pub fn classify(selector: &'a str) -> Self {
        if let Some(id) = selector.strip_prefix('#').filter(|s| is_token(s)) {
            return Self::Id(id);
        }
        if let Some(class) = selector.strip_prefix('.').filter(|s| is_token(s)) {
            return Self::Class(class);
        }
        if !selector.is_empty() && selector.bytes().all(|b| b.is_ascii_lowercase()) {
            return Self::Tag(selector);
        }
        Self::General(selector)
    }

    /// Run the lookup under `scope` (descendants only, document order)
    pub fn lookup(self, doc: &Document, scope: NodeId) -> Result<Vec<NodeId>, SelectorError> {
        let found = match self {
            Self::Id(id) => doc.find_element_by_id(scope, id).into_iter().collect(),
            Self::Class(class) => doc.get_elements_by_class_name(scope, class),
            Self::Tag(tag) => doc.get_elements_by_tag_name(scope, tag),
            Self::General(selector) => query_selector_all(&doc.tree, scope, selector)?,
        };
        Ok(found)
    }
}

/// Word characters and hyphens
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Run `selector` under every scope and concatenate the results in scope order.
/// A scope whose lookup fails contributes nothing.
pub fn resolve(doc: &Document, scopes: &[NodeId], selector: &str) -> Vec<NodeId> {
    let kind = SelectorKind::classify(selector);
    tracing::trace!(selector, ?kind, scopes = scopes.len(), "resolving selector");

    let mut results = Vec::new();
    for &scope in scopes {
        match kind.lookup(doc, scope) {
            Ok(found) => results.extend(found),
            Err(err) => {
                tracing::debug!(selector, %scope, %err, "selector lookup failed; no results for this scope");
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SelectorKind::classify("#main"), SelectorKind::Id("main"));
        assert_eq!(SelectorKind::classify("#a-b_c1"), SelectorKind::Id("a-b_c1"));
        assert_eq!(SelectorKind::classify(".item"), SelectorKind::Class("item"));
        assert_eq!(SelectorKind::classify("span"), SelectorKind::Tag("span"));
        assert_eq!(SelectorKind::classify("SPAN"), SelectorKind::General("SPAN"));
        assert_eq!(SelectorKind::classify("h1"), SelectorKind::General("h1"));
        assert_eq!(SelectorKind::classify("#a.b"), SelectorKind::General("#a.b"));
        assert_eq!(SelectorKind::classify(".a .b"), SelectorKind::General(".a .b"));
        assert_eq!(SelectorKind::classify("#"), SelectorKind::General("#"));
        assert_eq!(SelectorKind::classify(""), SelectorKind::General(""));
    }

    #[test]
    fn test_resolve_concatenates_and_absorbs() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let a = doc.tree.create_element("div");
        let b = doc.tree.create_element("div");
        let p1 = doc.tree.create_element("p");
        let p2 = doc.tree.create_element("p");
        doc.tree.append_child(body, a).unwrap();
        doc.tree.append_child(body, b).unwrap();
        doc.tree.append_child(b, p2).unwrap();
        doc.tree.append_child(a, p1).unwrap();

        assert_eq!(resolve(&doc, &[b, a], "p"), vec![p2, p1]);
        assert_eq!(resolve(&doc, &[a, b], "div p"), vec![p1, p2]);
        assert!(resolve(&doc, &[a, b], "<nope>").is_empty());
    }

    #[test]
    fn test_id_lookup_is_scoped() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let a = doc.tree.create_element("div");
        let b = doc.tree.create_element("div");
        let target = doc.tree.create_element("span");
        doc.tree.element_mut(target).unwrap().set_attr("id", "t");
        doc.tree.append_child(body, a).unwrap();
        doc.tree.append_child(body, b).unwrap();
        doc.tree.append_child(b, target).unwrap();

        assert!(resolve(&doc, &[a], "#t").is_empty());
        assert_eq!(resolve(&doc, &[b], "#t"), vec![target]);
        assert_eq!(resolve(&doc, &[NodeId::ROOT], "#t"), vec![target]);
        assert!(resolve(&doc, &[NodeId::ROOT], "#missing").is_empty());
    }
}
