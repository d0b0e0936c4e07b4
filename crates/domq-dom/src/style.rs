//! Inline style declarations (element.style)
//!
//! The `style` attribute is the single source of truth; this type parses it,
//! edits it and writes it back.

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Parsed inline style block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    declarations: Vec<Declaration>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value. Malformed declarations are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for chunk in css_text.split(';') {
            let Some((property, value)) = chunk.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let mut value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            let mut important = false;
            if let Some(stripped) = value.strip_suffix("!important") {
                value = stripped.trim_end();
                important = true;
            }
            style.set(&to_kebab_case(property), value, important);
        }
        style
    }

    fn set(&mut self, property: &str, value: &str, important: bool) {
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(decl) => {
                decl.value = value.to_string();
                decl.important = important;
            }
            None => self.declarations.push(Declaration {
                property: property.to_string(),
                value: value.to_string(),
                important,
            }),
        }
    }

    /// Number of declarations
    pub fn length(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Value of a property (camelCase or kebab-case name)
    pub fn get_property_value(&self, property: &str) -> Option<&str> {
        let property = to_kebab_case(property);
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(property);
        } else {
            self.set(&to_kebab_case(property), value, false);
        }
    }

    /// Remove a property, returning its old value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let property = to_kebab_case(property);
        let pos = self.declarations.iter().position(|d| d.property == property)?;
        Some(self.declarations.remove(pos).value)
    }

    /// Serialize back to `style` attribute syntax
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.property, d.value)
                } else {
                    format!("{}: {};", d.property, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }
}

/// Convert an IDL attribute name (`backgroundColor`, `webkitTransform`,
/// `cssFloat`) to its CSS property name. Kebab-case input passes through.
pub fn to_kebab_case(name: &str) -> String {
    let name = name.trim();
    if name == "cssFloat" {
        return "float".to_string();
    }
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for prefix in ["webkit", "moz", "ms", "o"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
                out.push('-');
                out.push_str(prefix);
                push_kebab(rest, &mut out);
                return out;
            }
        }
    }
    push_kebab(name, &mut out);
    out
}

fn push_kebab(name: &str, out: &mut String) {
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
}
