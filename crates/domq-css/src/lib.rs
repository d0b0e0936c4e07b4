//! domq CSS - Selector engine
//!
//! Parses selector lists (compound selectors, combinators, attribute
//! selectors and the structural pseudo-classes) and matches them against a
//! `domq_dom::DomTree`. This is the selector-matching primitive the
//! collection layer builds `find`, `is` and `filter` on.

mod matching;
mod parser;
mod selector;

pub use matching::{matches_selector, query_selector, query_selector_all};
pub use parser::{SelectorError, parse_selector};
pub use selector::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};
