//! Forwarding operations
//!
//! Getters read from the first member; setters apply to every member and
//! return the receiver.

use domq_dom::{NodeId, PropValue, to_kebab_case};
use serde::{Deserialize, Serialize};

use crate::Collection;
use crate::property::{self, option_value, options};

/// Result of `val()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Single(String),
    /// Values of the selected options of a `<select multiple>`
    Multiple(Vec<String>),
}

impl Value {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }
}

/// Page-relative position and rounded size of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Collection {
    fn elements(&self) -> Vec<NodeId> {
        let doc = self.dom().document();
        self.iter().filter(|&n| doc.tree.is_element(n)).collect()
    }

    // ------------------------------------------------------------------
    // Attributes and properties
    // ------------------------------------------------------------------

    /// Attribute of the first member
    pub fn attr(&self, key: &str) -> Option<String> {
        let first = self.get(0)?;
        let doc = self.dom().document();
        doc.tree.element(first)?.get_attr(key).map(str::to_string)
    }

    /// Set an attribute on every member; `None` or an empty value removes it
    pub fn set_attr(&self, key: &str, value: Option<&str>) -> &Self {
        let mut doc = self.dom().document_mut();
        for node in self.iter() {
            let Some(element) = doc.tree.element_mut(node) else {
                continue;
            };
            match value {
                Some(value) if !value.is_empty() => element.set_attr(key, value),
                _ => {
                    element.remove_attr(key);
                }
            }
        }
        self
    }

    /// Property of the first member
    pub fn prop(&self, key: &str) -> Option<PropValue> {
        let first = self.get(0)?;
        property::read(&self.dom().document(), first, key)
    }

    pub fn set_prop(&self, key: &str, value: impl Into<PropValue>) -> &Self {
        let value = value.into();
        for node in self.iter() {
            property::write(self.dom(), node, key, value.clone());
        }
        self
    }

    /// Property of every member; `Null` where it is unset
    pub fn pluck(&self, key: &str) -> Vec<PropValue> {
        let doc = self.dom().document();
        self.iter()
            .map(|node| property::read(&doc, node, key).unwrap_or_default())
            .collect()
    }

    /// Form value of the first member
    pub fn val(&self) -> Option<Value> {
        let first = self.get(0)?;
        let doc = self.dom().document();
        let element = doc.tree.element(first)?;
        if element.has_attr("multiple") {
            let selected = options(&doc, first)
                .into_iter()
                .filter(|&o| doc.tree.element(o).is_some_and(|e| e.state("selected")))
                .map(|o| option_value(&doc, o))
                .collect();
            return Some(Value::Multiple(selected));
        }
        property::read(&doc, first, "value").map(|v| Value::Single(v.to_text()))
    }

    pub fn set_val(&self, value: &str) -> &Self {
        self.set_prop("value", value)
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// Add space-separated classes to every member
    pub fn add_class(&self, names: &str) -> &Self {
        let strategy = self.dom().class_strategy();
        let elements = self.elements();
        let mut doc = self.dom().document_mut();
        for node in elements {
            for class in names.split_whitespace() {
                strategy.add(&mut doc, node, class);
            }
        }
        self
    }

    pub fn remove_class(&self, names: &str) -> &Self {
        let strategy = self.dom().class_strategy();
        let elements = self.elements();
        let mut doc = self.dom().document_mut();
        for node in elements {
            for class in names.split_whitespace() {
                strategy.remove(&mut doc, node, class);
            }
        }
        self
    }

    pub fn toggle_class(&self, names: &str) -> &Self {
        let strategy = self.dom().class_strategy();
        let elements = self.elements();
        let mut doc = self.dom().document_mut();
        for node in elements {
            for class in names.split_whitespace() {
                if strategy.contains(&doc, node, class) {
                    strategy.remove(&mut doc, node, class);
                } else {
                    strategy.add(&mut doc, node, class);
                }
            }
        }
        self
    }

    /// Does the first member carry `class`?
    pub fn has_class(&self, class: &str) -> bool {
        let Some(first) = self.get(0) else {
            return false;
        };
        let doc = self.dom().document();
        doc.tree.is_element(first) && self.dom().class_strategy().contains(&doc, first, class)
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Text content of the first member
    pub fn text(&self) -> Option<String> {
        self.prop("textContent").map(|v| v.to_text())
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.set_prop("textContent", text)
    }

    /// Serialized children of the first member
    pub fn html(&self) -> Option<String> {
        self.prop("innerHTML").map(|v| v.to_text())
    }

    /// Replace the children of every member with parsed markup
    pub fn set_html(&self, markup: &str) -> &Self {
        for node in self.iter() {
            property::set_inner_html(self.dom(), node, markup);
        }
        self
    }

    // ------------------------------------------------------------------
    // Style
    // ------------------------------------------------------------------

    /// Inline value of a style property of the first member, else its
    /// computed value, else empty
    pub fn css(&self, name: &str) -> String {
        let Some(first) = self.get(0) else {
            return String::new();
        };
        let property = to_kebab_case(name);
        let doc = self.dom().document();
        if let Some(value) = doc.style(first).get_property_value(&property) {
            return value.to_string();
        }
        doc.computed_style(first, &property).unwrap_or_default()
    }

    /// Set an inline style property on every member; an empty value removes it
    pub fn set_css(&self, name: &str, value: &str) -> &Self {
        self.set_css_map([(name, value)])
    }

    pub fn set_css_map<K, V>(&self, properties: impl IntoIterator<Item = (K, V)>) -> &Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let properties: Vec<(String, V)> = properties
            .into_iter()
            .map(|(k, v)| (to_kebab_case(k.as_ref()), v))
            .collect();
        let elements = self.elements();
        let mut doc = self.dom().document_mut();
        for node in elements {
            let mut style = doc.style(node);
            for (property, value) in &properties {
                style.set_property(property, value.as_ref());
            }
            doc.set_style(node, &style);
        }
        self
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Bounding box of the first member shifted by the window scroll offset
    pub fn offset(&self) -> Option<Offset> {
        let first = self.get(0)?;
        let doc = self.dom().document();
        let (page_x, page_y) = doc.page_offset();
        let rect = doc.bounding_client_rect(first).translate(page_x, page_y);
        Some(Offset {
            left: rect.left(),
            top: rect.top(),
            width: rect.width.round(),
            height: rect.height.round(),
        })
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Detach every member that has a parent
    pub fn remove(&self) -> &Self {
        let mut doc = self.dom().document_mut();
        for node in self.iter() {
            if let Some(parent) = doc.tree.parent(node) {
                if let Err(err) = doc.tree.remove_child(parent, node) {
                    tracing::debug!(%node, %err, "Could not remove node");
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dom, DomConfig};
    use domq_dom::DOMRect;

    fn page(body: &str) -> Dom {
        Dom::parse(&format!("<html><body>{}</body></html>", body), DomConfig::default()).unwrap()
    }

    #[test]
    fn test_attr_set_and_remove() {
        let dom = page("<a href=\"/x\"></a><a></a>");
        let links = dom.select("a");
        assert_eq!(links.attr("href").as_deref(), Some("/x"));
        links.set_attr("title", Some("t"));
        assert_eq!(links.pluck("title"), vec![PropValue::Null, PropValue::Null]);
        assert_eq!(links.last().attr("title").as_deref(), Some("t"));
        links.set_attr("href", Some(""));
        assert_eq!(links.attr("href"), None);
        assert_eq!(dom.empty().attr("href"), None);
    }

    #[test]
    fn test_prop_and_pluck() {
        let dom = page("<p id=\"one\"></p><p id=\"two\"></p>");
        let ps = dom.select("p");
        assert_eq!(ps.pluck("id"), vec![PropValue::from("one"), PropValue::from("two")]);
        ps.set_prop("seen", true);
        assert_eq!(ps.last().prop("seen"), Some(PropValue::Bool(true)));
        assert_eq!(dom.empty().prop("id"), None);
    }

    #[test]
    fn test_val_single_and_multiple() {
        let dom = page(
            "<input id=\"i\" value=\"v\">\
             <select id=\"m\" multiple>\
             <option value=\"a\" selected>A</option><option>b</option><option selected>c</option>\
             </select>",
        );
        assert_eq!(dom.select("#i").val(), Some(Value::Single("v".into())));
        assert_eq!(
            dom.select("#m").val(),
            Some(Value::Multiple(vec!["a".to_string(), "c".to_string()]))
        );
        dom.select("#i").set_val("w");
        assert_eq!(dom.select("#i").val().as_ref().and_then(Value::as_single), Some("w"));
        assert_eq!(dom.empty().val(), None);
    }

    #[test]
    fn test_class_operations() {
        let dom = page("<div class=\"a\"></div><div></div>");
        let divs = dom.select("div");
        divs.add_class("b  c");
        assert_eq!(divs.attr("class").as_deref(), Some("a b c"));
        assert_eq!(divs.last().attr("class").as_deref(), Some("b c"));
        divs.remove_class("a c");
        assert!(divs.has_class("b"));
        assert!(!divs.has_class("a"));
        divs.toggle_class("b d");
        assert_eq!(divs.attr("class").as_deref(), Some("d"));
        assert!(!dom.empty().has_class("d"));
    }

    #[test]
    fn test_text_and_html() {
        let dom = page("<div><b>bold</b> text</div>");
        let div = dom.select("div");
        assert_eq!(div.text().as_deref(), Some("bold text"));
        assert_eq!(div.html().as_deref(), Some("<b>bold</b> text"));

        div.set_html("<i>1</i><i>2</i>");
        assert_eq!(div.children(None).len(), 2);
        div.set_text("<plain>");
        assert_eq!(div.html().as_deref(), Some("&lt;plain&gt;"));
        assert_eq!(dom.empty().text(), None);
    }

    #[test]
    fn test_css() {
        let dom = page("<div style=\"color: red\"></div>");
        let div = dom.select("div");
        assert_eq!(div.css("color"), "red");
        assert_eq!(div.css("display"), "block");
        assert_eq!(div.css("zIndex"), "");

        div.set_css("backgroundColor", "blue");
        assert_eq!(div.css("background-color"), "blue");
        div.set_css_map([("color", ""), ("margin-top", "4px")]);
        assert_eq!(div.css("marginTop"), "4px");
        assert_eq!(div.attr("style").as_deref(), Some("background-color: blue; margin-top: 4px;"));
        assert_eq!(dom.empty().css("color"), "");
    }

    #[test]
    fn test_offset() {
        let dom = page("<div></div>");
        let div = dom.select("div");
        let id = div.get(0).unwrap();
        {
            let mut doc = dom.document_mut();
            doc.set_layout_box(id, DOMRect::from_xywh(10.0, 20.0, 99.6, 40.4));
            doc.set_page_offset(5.0, 100.0);
        }
        assert_eq!(div.offset(), Some(Offset { left: 15.0, top: 120.0, width: 100.0, height: 40.0 }));
        assert_eq!(dom.empty().offset(), None);
    }

    #[test]
    fn test_remove_keeps_membership() {
        let dom = page("<p></p><p></p>");
        let ps = dom.select("p");
        let detached = dom.select("<span></span>");
        assert_eq!(ps.remove().len(), 2);
        assert!(dom.select("p").is_empty());
        assert_eq!(detached.remove().len(), 1);
    }
}
