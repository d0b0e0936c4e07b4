//! Element properties
//!
//! Reads and writes the IDL properties collections expose through `prop`.
//! Reflected names map onto attributes or tree content; any other name is an
//! expando kept in the element's property map.

use domq_dom::{Document, ElementData, NodeData, NodeId, PropValue};
use domq_html::{inner_html, outer_html};

use crate::Dom;

/// Current value of property `key` on `id`
pub(crate) fn read(doc: &Document, id: NodeId, key: &str) -> Option<PropValue> {
    let node = doc.tree.get(id)?;
    match key {
        "nodeName" => {
            let name = match &node.data {
                NodeData::Document => "#document".to_string(),
                NodeData::Doctype { name, .. } => name.clone(),
                NodeData::Element(element) => element.tag.to_ascii_uppercase(),
                NodeData::Text(_) => "#text".to_string(),
                NodeData::Comment(_) => "#comment".to_string(),
            };
            return Some(name.into());
        }
        "textContent" => {
            let text = match &node.data {
                NodeData::Document | NodeData::Doctype { .. } => PropValue::Null,
                NodeData::Text(text) | NodeData::Comment(text) => text.as_str().into(),
                NodeData::Element(_) => doc.tree.text_content(id).into(),
            };
            return Some(text);
        }
        _ => {}
    }

    let element = node.as_element()?;
    let value = match key {
        "id" => element.id().unwrap_or_default().into(),
        "className" => element.get_attr("class").unwrap_or_default().into(),
        "tagName" => element.tag.to_ascii_uppercase().into(),
        "innerHTML" => inner_html(&doc.tree, id).into(),
        "outerHTML" => outer_html(&doc.tree, id).into(),
        "value" => return value_of(doc, id, element).map(PropValue::from),
        "checked" | "selected" => element.state(key).into(),
        "disabled" | "multiple" => element.has_attr(key).into(),
        "type" => return input_type(element).map(PropValue::from),
        _ => return element.props.get(key).cloned(),
    };
    Some(value)
}

fn value_of(doc: &Document, id: NodeId, element: &ElementData) -> Option<String> {
    if let Some(value) = element.props.get("value") {
        return Some(value.to_text());
    }
    match element.tag.as_str() {
        "input" => {
            let fallback = match element.get_attr("type") {
                Some(t) if t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio") => "on",
                _ => "",
            };
            Some(element.get_attr("value").unwrap_or(fallback).to_string())
        }
        "button" | "li" | "param" | "data" | "meter" | "progress" => {
            Some(element.get_attr("value").unwrap_or_default().to_string())
        }
        "textarea" => Some(doc.tree.text_content(id)),
        "option" => Some(option_value(doc, id)),
        "select" => {
            let all = options(doc, id);
            let selected = all
                .iter()
                .copied()
                .find(|&o| doc.tree.element(o).is_some_and(|e| e.state("selected")))
                .or_else(|| all.first().copied());
            Some(selected.map(|o| option_value(doc, o)).unwrap_or_default())
        }
        _ => None,
    }
}

fn input_type(element: &ElementData) -> Option<String> {
    match element.get_attr("type") {
        Some(t) => Some(t.to_ascii_lowercase()),
        None if element.tag == "input" => Some("text".to_string()),
        None if element.tag == "button" => Some("submit".to_string()),
        None => element.props.get("type").map(PropValue::to_text),
    }
}

/// `option.value`: the attribute, else the whitespace-collapsed text
pub(crate) fn option_value(doc: &Document, option: NodeId) -> String {
    if let Some(value) = doc.tree.element(option).and_then(|e| e.get_attr("value")) {
        return value.to_string();
    }
    doc.tree.text_content(option).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `<option>` descendants of a `<select>`, in document order
pub(crate) fn options(doc: &Document, select: NodeId) -> Vec<NodeId> {
    doc.tree
        .descendants(select)
        .filter(|&d| doc.tree.tag_name(d) == Some("option"))
        .collect()
}

/// Assign property `key` on `id`
pub(crate) fn write(dom: &Dom, id: NodeId, key: &str, value: PropValue) {
    match key {
        "innerHTML" => return set_inner_html(dom, id, &value.to_text()),
        "outerHTML" => return replace_with_markup(dom, id, &value.to_text()),
        _ => {}
    }

    let mut doc = dom.document_mut();
    let Some(node) = doc.tree.get(id) else {
        return;
    };

    if key == "textContent" {
        if node.is_document() {
            return;
        }
        if let Err(err) = doc.tree.set_text_content(id, &value.to_text()) {
            tracing::debug!(%id, %err, "Could not set text content");
        }
        return;
    }

    if key == "value" && doc.tree.tag_name(id) == Some("select") {
        let wanted = value.to_text();
        for option in options(&doc, id) {
            let selected = option_value(&doc, option) == wanted;
            if let Some(element) = doc.tree.element_mut(option) {
                element.props.insert("selected".to_string(), selected.into());
            }
        }
        return;
    }

    let Some(element) = doc.tree.element_mut(id) else {
        tracing::trace!(%id, key, "Property write on a non-element ignored");
        return;
    };
    match key {
        "id" => element.set_attr("id", &value.to_text()),
        "className" => element.set_attr("class", &value.to_text()),
        "tagName" | "nodeName" => tracing::trace!(key, "Read-only property"),
        "value" => {
            element.props.insert(key.to_string(), value.to_text().into());
        }
        "checked" | "selected" => {
            element.props.insert(key.to_string(), value.is_truthy().into());
        }
        "disabled" | "multiple" => {
            if value.is_truthy() {
                element.set_attr(key, "");
            } else {
                element.remove_attr(key);
            }
        }
        "type" => element.set_attr("type", &value.to_text()),
        _ => {
            element.props.insert(key.to_string(), value);
        }
    }
}

/// Replace the children of `id` with parsed markup
pub(crate) fn set_inner_html(dom: &Dom, id: NodeId, markup: &str) {
    {
        let mut doc = dom.document_mut();
        if !doc.tree.is_element(id) {
            return;
        }
        doc.tree.remove_children(id);
    }
    dom.parse_into(markup, id, None);
}

fn replace_with_markup(dom: &Dom, id: NodeId, markup: &str) {
    let parent = {
        let doc = dom.document();
        if !doc.tree.is_element(id) {
            return;
        }
        match doc.tree.parent(id) {
            Some(parent) if doc.tree.is_element(parent) => parent,
            _ => {
                tracing::debug!(%id, "outerHTML needs an element parent");
                return;
            }
        }
    };
    dom.parse_into(markup, parent, Some(id));
    dom.document_mut().tree.detach(id);
}
