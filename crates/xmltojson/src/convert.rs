//! XML document tree to JSON-like tree conversion

use indexmap::IndexMap;

use crate::coerce::detect_types;
use crate::options::Options;
use crate::value::{insert_child, Object, Value};
use crate::xml::model::{Content, Document, Element};

/// Namespace prefix table in scope for one subtree. Cloned into each
/// recursive descent: additions inside a subtree are never visible to
/// sibling subtrees, while every ancestor declaration stays in scope.
type NamespaceScope = IndexMap<String, String>;

/// Convert a parsed XML document into the JSON-like tree
pub fn build(doc: &Document, options: &Options) -> Value {
    let mut target = Object::new();
    build_element(&doc.root, &mut target, NamespaceScope::new(), options);
    Value::Object(target)
}

fn build_element(
    element: &Element,
    parent: &mut Object,
    mut ns: NamespaceScope,
    options: &Options,
) {
    let value_id = options.value_identifier.as_str();
    let attr_id = options.attribute_identifier.as_str();

    // Prefixes this element activates, in declaration order.
    let mut active: Vec<String> = Vec::new();

    // A general namespace in scope stays active for the whole subtree.
    if ns.contains_key(value_id) {
        activate(&mut active, value_id);
    }
    if let Some(prefix) = element.prefix() {
        activate(&mut active, prefix);
    }

    let mut current = Object::new();

    for (name, raw) in &element.attributes {
        if name == "xmlns" {
            // General namespace declaration, recorded under the value
            // identifier.
            ns.insert(value_id.to_string(), filter_text(raw, options));
            activate(&mut active, value_id);
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            ns.insert(prefix.to_string(), filter_text(raw, options));
        } else if let Some((prefix, _)) = name.split_once(':') {
            // Prefixed attribute: stored as-is, prefix marked active.
            current.insert(format!("{attr_id}{name}"), coerce_text(raw, options));
            activate(&mut active, prefix);
        } else {
            let value = coerce_text(raw, options);
            let empty = matches!(&value, Value::String(s) if s.is_empty())
                || value.is_null();
            if options.empty_values_as_null && empty {
                current.insert(format!("{attr_id}{name}"), Value::Null);
            } else {
                current.insert(format!("{attr_id}{name}"), value);
            }
        }
    }

    let injected = if options.namespaces {
        ns.iter()
            .map(|(prefix, uri)| (prefix.clone(), Value::String(uri.clone())))
            .collect::<Vec<_>>()
    } else {
        active
            .iter()
            .map(|prefix| {
                let value = match ns.get(prefix) {
                    Some(uri) => Value::String(uri.clone()),
                    None => Value::Bool(true),
                };
                (prefix.clone(), value)
            })
            .collect()
    };
    if !injected.is_empty() {
        let mut table = Object::new();
        for (prefix, value) in injected {
            table.insert(prefix, value);
        }
        current.insert(format!("{attr_id}xmlns"), Value::Object(table));
    }

    for child in &element.children {
        match child {
            Content::Element(child) => {
                build_element(child, &mut current, ns.clone(), options);
            }
            Content::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                insert_child(&mut current, value_id, coerce_text(text, options));
            }
        }
    }

    insert_child(parent, &element.name, Value::Object(current));

    // A childless element collapses to null, discarding any attributes
    // already collected. The whole slot is overwritten, so a promoted
    // array of siblings collapses too. Documented quirk of the original,
    // preserved deliberately.
    if options.empty_values_as_null && element.is_childless() {
        parent.insert(element.name.clone(), Value::Null);
    }
}

fn activate(active: &mut Vec<String>, prefix: &str) {
    if !active.iter().any(|p| p == prefix) {
        active.push(prefix.to_string());
    }
}

fn filter_text(raw: &str, options: &Options) -> String {
    match &options.filter {
        Some(filter) => filter(raw),
        None => raw.to_string(),
    }
}

fn coerce_text(raw: &str, options: &Options) -> Value {
    let filtered = filter_text(raw, options);
    if options.detect_types {
        detect_types(&filtered)
    } else {
        Value::String(filtered)
    }
}
