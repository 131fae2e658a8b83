//! Structural edits: node creation, assignment and removal

use tracing::warn;

use crate::options::Options;
use crate::query::{get, resolve, Path, PathStep};
use crate::value::{Object, Value};

/// Create an empty object at every path segment not yet present.
/// Idempotent: a path that already resolves is left untouched. A falsy
/// slot along the way is overwritten with an empty object; a truthy
/// non-object blocks the walk without error.
pub fn create_nodes(root: &mut Value, path: &Path, options: &Options) {
    if path.is_empty() || resolve(root, path).is_some() {
        return;
    }

    for len in 1..=path.steps.len() {
        let prefix = Path {
            steps: path.steps.get(..len).map(<[PathStep]>::to_vec).unwrap_or_default(),
            wildcard: false,
        };
        if resolve(root, &prefix).is_none()
            && !set(root, &prefix, Value::Object(Object::new()))
            && options.log
        {
            warn!(path = ?prefix, "cannot create node");
        }
    }
}

/// Assign `value` at `path`, whose parent chain must already resolve.
/// Returns false when the parent chain is missing or not an object.
pub fn set(root: &mut Value, path: &Path, value: Value) -> bool {
    let Some((parent, step)) = locate_parent(root, path) else {
        return false;
    };

    match step.index {
        None => {
            parent.insert(step.key.clone(), value);
            true
        }
        Some(index) => {
            let Some(slot) = parent.get_mut(&step.key).and_then(Value::as_array_mut) else {
                return false;
            };
            if let Some(existing) = slot.get_mut(index) {
                *existing = value;
                true
            } else if index == slot.len() {
                slot.push(value);
                true
            } else {
                false
            }
        }
    }
}

/// Delete the value addressed by `path` from its parent. Guarded by a
/// truthy `get`: an absent or falsy target is a no-op. Removing an
/// array slot compacts the remaining sequence by dropping falsy
/// entries, preserving survivor order.
pub fn remove(root: &mut Value, path: &Path, options: &Options) {
    if get(root, path, options).is_none() {
        return;
    }
    let Some((parent, step)) = locate_parent(root, path) else {
        return;
    };

    match step.index {
        None => {
            parent.remove(&step.key);
        }
        Some(index) => {
            if let Some(arr) = parent.get_mut(&step.key).and_then(Value::as_array_mut) {
                arr.remove(index);
                arr.compact();
            }
        }
    }
}

/// Walk to the object holding the last path step
fn locate_parent<'a, 'p>(
    root: &'a mut Value,
    path: &'p Path,
) -> Option<(&'a mut Object, &'p PathStep)> {
    let (last, rest) = path.steps.split_last()?;
    let mut current = root;
    for step in rest {
        current = current.as_object_mut()?.get_mut(&step.key)?;
        if let Some(index) = step.index {
            current = current.as_array_mut()?.get_mut(index)?;
        }
    }
    Some((current.as_object_mut()?, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Array;

    fn empty_tree() -> Value {
        Value::Object(Object::new())
    }

    fn options() -> Options {
        Options::default()
    }

    #[test]
    fn test_create_nodes_builds_chain() {
        let mut tree = empty_tree();
        create_nodes(&mut tree, &Path::parse("a.b.c"), &options());

        let c = get(&tree, &Path::parse("a.b.c"), &options());
        assert_eq!(c, Some(&Value::Object(Object::new())));
    }

    #[test]
    fn test_create_nodes_idempotent() {
        let mut tree = empty_tree();
        create_nodes(&mut tree, &Path::parse("a.b.c"), &options());
        let once = tree.clone();
        create_nodes(&mut tree, &Path::parse("a.b.c"), &options());
        assert_eq!(tree, once);
    }

    #[test]
    fn test_create_nodes_keeps_existing_content() {
        let mut tree = empty_tree();
        assert!(set(&mut tree, &Path::parse("a"), Value::Object(Object::new())));
        assert!(set(&mut tree, &Path::parse("a.x"), Value::String("keep".into())));

        create_nodes(&mut tree, &Path::parse("a.b"), &options());
        assert_eq!(
            get(&tree, &Path::parse("a.x"), &options()),
            Some(&Value::String("keep".into()))
        );
        assert!(get(&tree, &Path::parse("a.b"), &options()).is_some());
    }

    #[test]
    fn test_create_nodes_overwrites_falsy_slot() {
        let mut tree = empty_tree();
        assert!(set(&mut tree, &Path::parse("a"), Value::Null));
        create_nodes(&mut tree, &Path::parse("a.b"), &options());
        assert!(get(&tree, &Path::parse("a.b"), &options()).is_some());
    }

    #[test]
    fn test_remove_key() {
        let mut tree = empty_tree();
        create_nodes(&mut tree, &Path::parse("a.b"), &options());
        remove(&mut tree, &Path::parse("a.b"), &options());
        assert!(get(&tree, &Path::parse("a.b"), &options()).is_none());
        assert!(get(&tree, &Path::parse("a"), &options()).is_some());
    }

    #[test]
    fn test_remove_array_slot_compacts() {
        let mut tree = empty_tree();
        let items = Array::from(vec![
            Value::String("a".into()),
            Value::String("b".into()),
            Value::String("c".into()),
        ]);
        assert!(set(&mut tree, &Path::parse("items"), Value::Array(items)));

        remove(&mut tree, &Path::parse("items[1]"), &options());
        let arr = get(&tree, &Path::parse("items"), &options())
            .and_then(Value::as_array);
        assert_eq!(arr.map(Array::len), Some(2));
        assert_eq!(arr.and_then(|a| a.get(0)), Some(&Value::String("a".into())));
        assert_eq!(arr.and_then(|a| a.get(1)), Some(&Value::String("c".into())));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut tree = empty_tree();
        create_nodes(&mut tree, &Path::parse("a"), &options());
        let before = tree.clone();
        remove(&mut tree, &Path::parse("a.missing.deep"), &options());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_set_indexed_slot() {
        let mut tree = empty_tree();
        let items = Array::from(vec![Value::String("a".into())]);
        assert!(set(&mut tree, &Path::parse("items"), Value::Array(items)));
        assert!(set(&mut tree, &Path::parse("items[0]"), Value::String("z".into())));
        assert_eq!(
            get(&tree, &Path::parse("items[0]"), &options()),
            Some(&Value::String("z".into()))
        );
    }
}
