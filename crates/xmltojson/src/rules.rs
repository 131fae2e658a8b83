//! Ordered move/rename rules applied after conversion

use tracing::{debug, warn};

use crate::edit;
use crate::options::Options;
use crate::query::{find, Path, PathStep};
use crate::value::Value;

/// Apply the configured `modify` rules strictly in order; later rules
/// see the effects of earlier ones.
pub fn apply(root: &mut Value, options: &Options) {
    for (source_spec, dest_spec) in &options.modify {
        apply_rule(root, source_spec, dest_spec, options);
    }
}

fn apply_rule(root: &mut Value, source_spec: &str, dest_spec: &str, options: &Options) {
    let source = Path::parse(source_spec);
    let wildcard = source.wildcard;

    let Some(content) = find(root, &source, None, options) else {
        if options.log {
            debug!(source = source_spec, "rule source resolved to nothing");
        }
        return;
    };

    let dest = Path::parse(dest_spec);

    if !wildcard {
        edit::remove(root, &source, options);
    }
    if let Some(parent) = dest.parent() {
        edit::create_nodes(root, &parent, options);
    }
    edit::create_nodes(root, &dest, options);

    if wildcard {
        move_children(root, &source, &dest, content, options);
    } else {
        edit::set(root, &dest, content);
    }

    if options.clear_empty_nodes {
        clear_source_parent(root, &source, wildcard, options);
    }
}

/// Wildcard mode: every non-attribute child of the source is assigned
/// individually under the destination (an empty destination merges at
/// top level), then removed from the source. The source node itself
/// stays behind, emptied of non-attribute children.
fn move_children(
    root: &mut Value,
    source: &Path,
    dest: &Path,
    content: Value,
    options: &Options,
) {
    let Value::Object(children) = content else {
        if options.log {
            warn!(source = ?source, "wildcard rule source is not a single node");
        }
        return;
    };

    let moved: Vec<String> = children
        .keys()
        .filter(|key| !options.is_attribute_key(key))
        .cloned()
        .collect();

    for (key, value) in children {
        if options.is_attribute_key(&key) {
            continue;
        }
        let mut target = dest.clone();
        target.steps.push(PathStep { key, index: None });
        edit::set(root, &target, value);
    }

    for key in moved {
        let mut child = source.clone();
        child.wildcard = false;
        child.steps.push(PathStep { key, index: None });
        edit::remove(root, &child, options);
    }
}

/// Remove the former source parent when everything left in it is an
/// attribute entry or a trivial child: an object with no entries, or
/// with exactly one entry while namespaces are disabled (the synthetic
/// namespace injection does not count as content).
fn clear_source_parent(root: &mut Value, source: &Path, wildcard: bool, options: &Options) {
    let parent_path = if wildcard {
        let mut path = source.clone();
        path.wildcard = false;
        path
    } else {
        match source.parent() {
            Some(parent) => parent,
            None => return,
        }
    };

    let Some(parent) = find(root, &parent_path, None, options) else {
        return;
    };
    let Some(obj) = parent.as_object() else {
        return;
    };

    let empty = obj.iter().all(|(key, value)| {
        options.is_attribute_key(key) || is_trivial(value, options)
    });
    if empty {
        edit::remove(root, &parent_path, options);
    }
}

fn is_trivial(value: &Value, options: &Options) -> bool {
    match value.as_object() {
        Some(obj) => obj.is_empty() || (obj.len() == 1 && !options.namespaces),
        None => false,
    }
}
