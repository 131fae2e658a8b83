//! Dot-path parsing and resolution against the converted tree

use tracing::warn;

use crate::condition::Condition;
use crate::options::Options;
use crate::value::{Array, Value};

/// One navigation step: a key with an optional array index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub key: String,
    pub index: Option<usize>,
}

/// Parsed dot-path. A trailing `.*` marks wildcard ("all children")
/// mode, consumed by the rule engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub steps: Vec<PathStep>,
    pub wildcard: bool,
}

impl Path {
    /// Parse a dot-path such as `root.items.item[2]` or `root.old.*`.
    /// A leading dot is tolerated; empty segments are dropped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('.').unwrap_or(raw);
        let (raw, wildcard) = match raw.strip_suffix(".*") {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let steps = raw
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(parse_step)
            .collect();

        Self { steps, wildcard }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Path without its last step (the parent path). A single-step
    /// path has no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.steps.len() < 2 {
            return None;
        }
        let steps = self.steps.get(..self.steps.len() - 1)?.to_vec();
        Some(Self {
            steps,
            wildcard: false,
        })
    }

    pub fn last_key(&self) -> Option<&str> {
        self.steps.last().map(|step| step.key.as_str())
    }
}

/// `key[3]` splits into key and index; a malformed index leaves the
/// whole segment as a literal key.
fn parse_step(segment: &str) -> PathStep {
    if let Some((key, rest)) = segment.split_once('[') {
        if let Some(index) = rest.strip_suffix(']') {
            if let Ok(index) = index.parse::<usize>() {
                return PathStep {
                    key: key.to_string(),
                    index: Some(index),
                };
            }
        }
    }
    PathStep {
        key: segment.to_string(),
        index: None,
    }
}

/// Strict navigation: every step must resolve through objects (and
/// arrays for indexed steps) and the final value must be truthy.
/// Returns None otherwise; never fails hard.
pub fn get<'a>(root: &'a Value, path: &Path, options: &Options) -> Option<&'a Value> {
    let resolved = resolve(root, path);
    if resolved.is_none() && options.log {
        warn!(path = ?path, "invalid path");
    }
    resolved
}

/// `get` without the diagnostic, for probing during node creation
pub(crate) fn resolve<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for step in &path.steps {
        current = current.as_object()?.get(&step.key)?;
        if let Some(index) = step.index {
            current = current.as_array()?.get(index)?;
        }
    }
    if current.is_truthy() {
        Some(current)
    } else {
        None
    }
}

/// Tolerant navigation with fan-out: when a sequence is met before the
/// path ends, the named child is collected from every element
/// (flattening one level of nested sequences) and resolution continues
/// per branch. Any empty intermediate invalidates the whole resolution.
pub fn find(
    root: &Value,
    path: &Path,
    condition: Option<&str>,
    options: &Options,
) -> Option<Value> {
    let resolved = find_inner(root, path);
    let Some(parts) = resolved else {
        if options.log {
            warn!(path = ?path, "invalid path");
        }
        return None;
    };

    let Some(condition) = condition else {
        return Some(parts);
    };
    let Some(condition) = Condition::parse(condition) else {
        if options.log {
            warn!("invalid condition");
        }
        return None;
    };

    match parts {
        Value::Array(arr) => {
            let kept: Vec<Value> = arr
                .into_iter()
                .filter(|part| condition.matches(part, options))
                .collect();
            Some(Value::Array(Array::from(kept)))
        }
        single => {
            if condition.matches(&single, options) {
                Some(single)
            } else {
                None
            }
        }
    }
}

fn find_inner(root: &Value, path: &Path) -> Option<Value> {
    let first = path.steps.first()?;
    let mut parts = root.as_object()?.get(&first.key)?.clone();
    if let Some(index) = first.index {
        parts = parts.as_array()?.get(index)?.clone();
    }
    if resolution_empty(&parts) {
        return None;
    }

    for step in path.steps.iter().skip(1) {
        let next = resolve_step(&parts, step)?;
        if resolution_empty(&next) {
            return None;
        }
        parts = next;
    }

    Some(parts)
}

/// Resolve one step against the current resolution set
fn resolve_step(parts: &Value, step: &PathStep) -> Option<Value> {
    if let Some(index) = step.index {
        // Explicit index: the current node must hold the key directly.
        return parts
            .as_object()?
            .get(&step.key)?
            .as_array()?
            .get(index)
            .cloned();
    }

    match parts {
        Value::Array(arr) => {
            let mut collected = Vec::new();
            for part in arr {
                match part {
                    Value::Array(inner) => {
                        for sub in inner {
                            if let Some(child) = child_of(sub, &step.key) {
                                collected.push(child.clone());
                            }
                        }
                    }
                    other => {
                        if let Some(child) = child_of(other, &step.key) {
                            collected.push(child.clone());
                        }
                    }
                }
            }
            Some(Value::Array(Array::from(collected)))
        }
        other => other.as_object()?.get(&step.key).cloned(),
    }
}

fn child_of<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value.as_object()?.get(key) {
        Some(Value::Null) | None => None,
        Some(child) => Some(child),
    }
}

/// Resolve a condition subpath relative to one candidate element
pub(crate) fn resolve_relative(candidate: &Value, steps: &[PathStep]) -> Option<Value> {
    let mut parts = candidate.clone();
    for step in steps {
        let next = resolve_step(&parts, step)?;
        if resolution_empty(&next) {
            return None;
        }
        parts = next;
    }
    Some(parts)
}

/// A falsy value or an empty collection invalidates the resolution
fn resolution_empty(value: &Value) -> bool {
    match value {
        Value::Array(arr) => arr.is_empty(),
        other => !other.is_truthy(),
    }
}
