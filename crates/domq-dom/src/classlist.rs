//! `classList` view over the `class` attribute

use std::fmt;

/// Ordered set of class tokens, first occurrence wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a `class` attribute value on ASCII whitespace
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.add(token);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Append `token` unless it is empty or already present.
    /// Returns whether the list changed.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Returns whether the list changed
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Serialized form written back to the `class` attribute
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_duplicates() {
        let list = DOMTokenList::from_string("  btn btn-primary\tbtn ");
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["btn", "btn-primary"]);
        assert!(DOMTokenList::from_string(" \n ").is_empty());
    }

    #[test]
    fn test_add_and_remove_report_changes() {
        let mut list = DOMTokenList::from_string("a");
        assert!(list.add("b"));
        assert!(!list.add("a"));
        assert!(!list.add(""));
        assert_eq!(list.to_string(), "a b");

        assert!(list.remove("a"));
        assert!(!list.remove("a"));
        assert_eq!(list.value(), "b");
    }
}
