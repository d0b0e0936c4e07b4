//! Selector matching against a `DomTree`
//!
//! Complex selectors are matched right to left: the subject compound is tested
//! on the candidate, then each combinator moves to the ancestors or preceding
//! siblings that could satisfy the next compound, backtracking on failure.

use domq_dom::{DomTree, ElementData, NodeId};

use crate::parser::{SelectorError, parse_selector};
use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorList,
};

/// Form controls that can be disabled
const DISABLEABLE: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

/// Check whether `element` matches `selector`
pub fn matches_selector(tree: &DomTree, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
    let list = parse_selector(selector)?;
    Ok(list.matches(tree, element))
}

/// All descendants of `scope` matching `selector`, in document order.
///
/// Ancestor conditions are evaluated against the whole tree, so `body p`
/// finds paragraphs inside a scope that is itself below `<body>`.
pub fn query_selector_all(tree: &DomTree, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let list = parse_selector(selector)?;
    let found: Vec<NodeId> = tree.descendants(scope).filter(|&n| list.matches(tree, n)).collect();
    tracing::trace!(selector, %scope, matched = found.len(), "query_selector_all");
    Ok(found)
}

/// First descendant of `scope` matching `selector`
pub fn query_selector(tree: &DomTree, scope: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    let list = parse_selector(selector)?;
    Ok(tree.descendants(scope).find(|&n| list.matches(tree, n)))
}

impl SelectorList {
    /// Check whether an element matches any selector of the list
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        tree.is_element(element) && self.0.iter().any(|complex| complex.matches(tree, element))
    }
}

impl ComplexSelector {
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        !self.compounds.is_empty() && match_from(tree, element, self, self.compounds.len() - 1)
    }
}

impl CompoundSelector {
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        let Some(data) = tree.element(element) else {
            return false;
        };
        self.components
            .iter()
            .all(|component| match_component(tree, element, data, component))
    }
}

fn match_from(tree: &DomTree, element: NodeId, selector: &ComplexSelector, index: usize) -> bool {
    if !selector.compounds[index].matches(tree, element) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Child => tree
            .parent(element)
            .is_some_and(|parent| match_from(tree, parent, selector, next)),
        Combinator::Descendant => tree
            .ancestors(element)
            .any(|ancestor| match_from(tree, ancestor, selector, next)),
        Combinator::NextSibling => tree
            .prev_element_sibling(element)
            .is_some_and(|sibling| match_from(tree, sibling, selector, next)),
        Combinator::SubsequentSibling => {
            std::iter::successors(tree.prev_element_sibling(element), |&s| tree.prev_element_sibling(s))
                .any(|sibling| match_from(tree, sibling, selector, next))
        }
    }
}

/// Match a selector component against an element
fn match_component(tree: &DomTree, element: NodeId, data: &ElementData, component: &SelectorComponent) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => data.tag == *tag,
        SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => data.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(data.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(tree, element, data, pseudo),
    }
}

/// Match a pseudo-class against an element
fn match_pseudo_class(tree: &DomTree, element: NodeId, data: &ElementData, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::Root => tree.parent(element) == Some(tree.root()),
        PseudoClass::Empty => tree.children(element).all(|(_, node)| {
            !node.is_element() && node.as_text().is_none_or(str::is_empty)
        }),

        PseudoClass::FirstChild => sibling_position(tree, element, None).0 == 1,
        PseudoClass::LastChild => {
            let (index, count) = sibling_position(tree, element, None);
            index == count
        }
        PseudoClass::OnlyChild => sibling_position(tree, element, None).1 == 1,
        PseudoClass::FirstOfType => sibling_position(tree, element, Some(data.tag.as_str())).0 == 1,
        PseudoClass::LastOfType => {
            let (index, count) = sibling_position(tree, element, Some(data.tag.as_str()));
            index == count
        }
        PseudoClass::OnlyOfType => sibling_position(tree, element, Some(data.tag.as_str())).1 == 1,
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, element, None).0 as i32),
        PseudoClass::NthLastChild(expr) => {
            let (index, count) = sibling_position(tree, element, None);
            expr.matches((count - index + 1) as i32)
        }
        PseudoClass::NthOfType(expr) => {
            expr.matches(sibling_position(tree, element, Some(data.tag.as_str())).0 as i32)
        }
        PseudoClass::NthLastOfType(expr) => {
            let (index, count) = sibling_position(tree, element, Some(data.tag.as_str()));
            expr.matches((count - index + 1) as i32)
        }

        PseudoClass::Checked => match data.tag.as_str() {
            "input" => data.state("checked"),
            "option" => data.state("selected"),
            _ => false,
        },
        PseudoClass::Disabled => DISABLEABLE.contains(&data.tag.as_str()) && data.state("disabled"),
        PseudoClass::Enabled => DISABLEABLE.contains(&data.tag.as_str()) && !data.state("disabled"),

        PseudoClass::Not(compounds) => !compounds.iter().any(|c| c.matches(tree, element)),
    }
}

/// 1-based index of `element` among its element siblings (optionally only
/// those with tag `of_type`) and the number of such siblings. A parentless
/// element is its own only sibling.
fn sibling_position(tree: &DomTree, element: NodeId, of_type: Option<&str>) -> (usize, usize) {
    let Some(parent) = tree.parent(element) else {
        return (1, 1);
    };
    let mut index = 0;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if of_type.is_some_and(|tag| tree.tag_name(sibling) != Some(tag)) {
            continue;
        }
        count += 1;
        if sibling == element {
            index = count;
        }
    }
    (index, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <div id="root"><ul class="list"><li>a</li><li class="x">b</li><li>c</li></ul><p/></div>
    fn fixture() -> (DomTree, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let ul = tree.create_element("ul");
        let p = tree.create_element("p");
        tree.element_mut(div).unwrap().set_attr("id", "root");
        tree.element_mut(ul).unwrap().set_attr("class", "list");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, ul).unwrap();
        let mut items = Vec::new();
        for text in ["a", "b", "c"] {
            let li = tree.create_element("li");
            let t = tree.create_text(text);
            tree.append_child(li, t).unwrap();
            tree.append_child(ul, li).unwrap();
            items.push(li);
        }
        tree.element_mut(items[1]).unwrap().set_attr("class", "x");
        tree.append_child(div, p).unwrap();
        (tree, vec![div, ul, items[0], items[1], items[2], p])
    }

    #[test]
    fn test_compound_matching() {
        let (tree, ids) = fixture();
        assert!(matches_selector(&tree, ids[0], "div#root").unwrap());
        assert!(matches_selector(&tree, ids[3], "li.x").unwrap());
        assert!(!matches_selector(&tree, ids[2], "li.x").unwrap());
        assert!(matches_selector(&tree, ids[1], "[class=list]").unwrap());
    }

    #[test]
    fn test_combinators() {
        let (tree, ids) = fixture();
        assert!(matches_selector(&tree, ids[3], "#root li").unwrap());
        assert!(matches_selector(&tree, ids[3], "ul > li").unwrap());
        assert!(!matches_selector(&tree, ids[3], "div > li").unwrap());
        assert!(matches_selector(&tree, ids[3], "li + li").unwrap());
        assert!(!matches_selector(&tree, ids[2], "li + li").unwrap());
        assert!(matches_selector(&tree, ids[4], ".x ~ li").unwrap());
        assert!(matches_selector(&tree, ids[5], "ul + p").unwrap());
    }

    #[test]
    fn test_descendant_backtracking() {
        let (tree, ids) = fixture();
        assert!(matches_selector(&tree, ids[2], "div ul li").unwrap());
        assert!(!matches_selector(&tree, ids[2], "p li").unwrap());
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let (tree, ids) = fixture();
        assert!(matches_selector(&tree, ids[2], "li:first-child").unwrap());
        assert!(matches_selector(&tree, ids[4], "li:last-child").unwrap());
        assert!(matches_selector(&tree, ids[3], "li:nth-child(2)").unwrap());
        assert!(matches_selector(&tree, ids[2], "li:nth-last-child(3)").unwrap());
        assert!(matches_selector(&tree, ids[5], "p:only-of-type").unwrap());
        assert!(matches_selector(&tree, ids[0], ":root").unwrap());
        assert!(matches_selector(&tree, ids[5], ":empty").unwrap());
        assert!(!matches_selector(&tree, ids[2], ":empty").unwrap());
        assert!(matches_selector(&tree, ids[2], "li:not(.x)").unwrap());
        assert!(!matches_selector(&tree, ids[3], "li:not(.x)").unwrap());
    }

    #[test]
    fn test_query_selector_all_is_scoped() {
        let (tree, ids) = fixture();
        assert_eq!(query_selector_all(&tree, ids[1], "li").unwrap(), vec![ids[2], ids[3], ids[4]]);
        assert_eq!(query_selector_all(&tree, ids[1], "div li").unwrap().len(), 3);
        assert!(query_selector_all(&tree, ids[1], "div").unwrap().is_empty());
        assert_eq!(query_selector(&tree, tree.root(), "li, p").unwrap(), Some(ids[2]));
        assert_eq!(query_selector_all(&tree, tree.root(), "p, ul").unwrap(), vec![ids[1], ids[5]]);
    }

    #[test]
    fn test_form_states() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let span = tree.create_element("span");
        tree.element_mut(input).unwrap().set_attr("checked", "");
        tree.element_mut(span).unwrap().set_attr("disabled", "");
        assert!(matches_selector(&tree, input, ":checked").unwrap());
        assert!(matches_selector(&tree, input, "input:enabled").unwrap());
        assert!(!matches_selector(&tree, span, ":disabled").unwrap());
    }

    #[test]
    fn test_non_elements_never_match() {
        let mut tree = DomTree::new();
        let text = tree.create_text("x");
        assert!(!matches_selector(&tree, text, "*").unwrap());
        assert!(!matches_selector(&tree, tree.root(), "*").unwrap());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let (tree, ids) = fixture();
        assert!(matches_selector(&tree, ids[0], "<not a valid selector>").is_err());
        assert!(query_selector_all(&tree, ids[0], "div >").is_err());
    }
}
