//! Element attributes in source order

/// A single `name="value"` pair; names are stored lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        Self { name, value: value.into() }
    }
}

/// Attribute list of an element. Lookups are ASCII case-insensitive and
/// serialization follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.attributes[i].value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set `name`, keeping its position when it already exists.
    /// Returns the previous value.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        match self.position(name) {
            Some(i) => Some(std::mem::replace(&mut self.attributes[i].value, value.to_string())),
            None => {
                self.attributes.push(Attr::new(name, value));
                None
            }
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attr> {
        self.position(name).map(|i| self.attributes.remove(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("Data-Id", "7");
        assert_eq!(attrs.get_attribute("data-id"), Some("7"));
        assert!(attrs.has_attribute("DATA-ID"));
        assert_eq!(attrs.iter().next().map(|a| a.name.as_str()), Some("data-id"));
    }

    #[test]
    fn test_overwrite_keeps_source_order() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("for", "x");
        attrs.set_attribute("title", "t");
        assert_eq!(attrs.set_attribute("FOR", "y"), Some("x".to_string()));

        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["for", "title"]);
        assert_eq!(attrs.get_attribute("for"), Some("y"));
    }

    #[test]
    fn test_remove() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("a", "1");
        attrs.set_attribute("b", "2");
        assert_eq!(attrs.remove_attribute("A"), Some(Attr::new("a", "1")));
        assert!(attrs.remove_attribute("a").is_none());
        assert_eq!(attrs.len(), 1);
    }
}
