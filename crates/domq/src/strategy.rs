//! Host capability strategies
//!
//! Resolved once when a `Dom` is built, so hot paths dispatch on a plain enum
//! instead of probing the host on every call.

use domq_dom::{Document, HostFeatures, MatchesApi, NodeId};

/// How `is(selector)` tests an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The host's own matches entry point
    Native(MatchesApi),
    /// Attach detached elements to the scratch element and query their parent
    Reinsertion,
}

impl MatchStrategy {
    pub fn resolve(features: &HostFeatures) -> Self {
        features.preferred_matches().map_or(Self::Reinsertion, Self::Native)
    }
}

/// How classes are read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassStrategy {
    /// `element.classList`
    TokenList,
    /// Editing the `className` string
    ClassName,
}

impl ClassStrategy {
    pub fn resolve(features: &HostFeatures) -> Self {
        if features.class_list { Self::TokenList } else { Self::ClassName }
    }

    pub fn add(self, doc: &mut Document, element: NodeId, class: &str) {
        match self {
            Self::TokenList => {
                let mut list = doc.class_list(element);
                list.add(class);
                doc.set_class_list(element, &list);
            }
            Self::ClassName => {
                let current = class_name(doc, element);
                if !current.split_whitespace().any(|c| c == class) {
                    let updated = if current.is_empty() {
                        class.to_string()
                    } else {
                        format!("{} {}", current, class)
                    };
                    set_class_name(doc, element, &updated);
                }
            }
        }
    }

    pub fn remove(self, doc: &mut Document, element: NodeId, class: &str) {
        match self {
            Self::TokenList => {
                let mut list = doc.class_list(element);
                list.remove(class);
                doc.set_class_list(element, &list);
            }
            Self::ClassName => {
                let current = class_name(doc, element);
                let updated: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
                set_class_name(doc, element, &updated.join(" "));
            }
        }
    }

    pub fn contains(self, doc: &Document, element: NodeId, class: &str) -> bool {
        match self {
            Self::TokenList => doc.class_list(element).contains(class),
            Self::ClassName => class_name(doc, element).split_whitespace().any(|c| c == class),
        }
    }
}

fn class_name(doc: &Document, element: NodeId) -> String {
    doc.tree
        .element(element)
        .and_then(|e| e.get_attr("class"))
        .unwrap_or_default()
        .to_string()
}

fn set_class_name(doc: &mut Document, element: NodeId, value: &str) {
    if let Some(elem) = doc.tree.element_mut(element) {
        elem.set_attr("class", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_class(class: &str) -> (Document, NodeId) {
        let mut doc = Document::default();
        let div = doc.tree.create_element("div");
        if !class.is_empty() {
            doc.tree.element_mut(div).unwrap().set_attr("class", class);
        }
        (doc, div)
    }

    #[test]
    fn test_resolution() {
        assert_eq!(
            MatchStrategy::resolve(&HostFeatures::default()),
            MatchStrategy::Native(MatchesApi::Matches)
        );
        assert_eq!(MatchStrategy::resolve(&HostFeatures::bare()), MatchStrategy::Reinsertion);
        assert_eq!(ClassStrategy::resolve(&HostFeatures::default()), ClassStrategy::TokenList);
        assert_eq!(ClassStrategy::resolve(&HostFeatures::bare()), ClassStrategy::ClassName);
    }

    #[test]
    fn test_strategies_agree() {
        for strategy in [ClassStrategy::TokenList, ClassStrategy::ClassName] {
            let (mut doc, div) = element_with_class("a");
            strategy.add(&mut doc, div, "b");
            strategy.add(&mut doc, div, "b");
            assert_eq!(doc.tree.element(div).unwrap().get_attr("class"), Some("a b"));
            assert!(strategy.contains(&doc, div, "b"));

            strategy.remove(&mut doc, div, "a");
            assert_eq!(doc.tree.element(div).unwrap().get_attr("class"), Some("b"));
            assert!(!strategy.contains(&doc, div, "a"));
        }
    }

    #[test]
    fn test_class_name_on_empty_attribute() {
        let (mut doc, div) = element_with_class("");
        ClassStrategy::ClassName.add(&mut doc, div, "x");
        assert_eq!(doc.tree.element(div).unwrap().get_attr("class"), Some("x"));
    }
}
