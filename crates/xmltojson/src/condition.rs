//! Condition clauses filtering `find` results

use regex::RegexBuilder;
use tracing::warn;

use crate::coerce::parse_leading_int;
use crate::options::Options;
use crate::query::{resolve_relative, Path, PathStep};
use crate::value::Value;

/// Comparison operator of a condition clause
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Matches,
}

/// A parsed condition of the shape `[subpath ]operator rule`
#[derive(Clone, Debug)]
pub struct Condition {
    /// Nested steps resolved relative to the candidate; None when the
    /// subpath names a single key on the candidate itself
    subpath: Option<Vec<PathStep>>,
    /// Key compared when no nested subpath is given
    key: String,
    operator: Operator,
    rule: String,
}

impl Condition {
    /// Parse a condition clause. Two-character operators win over
    /// their one-character prefixes; the first operator occurrence
    /// splits subpath from rule. Malformed clauses yield None and are
    /// treated as non-matches.
    pub fn parse(raw: &str) -> Option<Self> {
        const OPERATORS: [(&str, Operator); 7] = [
            ("==", Operator::Eq),
            ("!=", Operator::Ne),
            (">=", Operator::Ge),
            ("<=", Operator::Le),
            ("=~", Operator::Matches),
            (">", Operator::Gt),
            ("<", Operator::Lt),
        ];

        for at in 0..raw.len() {
            if !raw.is_char_boundary(at) {
                continue;
            }
            let rest = raw.get(at..)?;
            for (token, operator) in OPERATORS {
                if let Some(after) = rest.strip_prefix(token) {
                    let subpath_raw = raw.get(..at)?.trim();
                    let rule = after.trim();
                    if subpath_raw.is_empty() || rule.is_empty() {
                        return None;
                    }

                    let path = Path::parse(subpath_raw);
                    let key = path.last_key()?.to_string();
                    let subpath = if path.steps.len() > 1 {
                        Some(path.steps)
                    } else {
                        None
                    };

                    return Some(Self {
                        subpath,
                        key,
                        operator,
                        rule: rule.to_string(),
                    });
                }
            }
        }
        None
    }

    /// Evaluate this condition against one candidate element
    pub fn matches(&self, candidate: &Value, options: &Options) -> bool {
        match &self.subpath {
            None => match extract_key(candidate, &self.key, options) {
                Some(value) => self.compare(&value),
                None => false,
            },
            Some(steps) => match resolve_relative(candidate, steps) {
                // Fan-out allowed: any branch satisfying the rule keeps
                // the candidate.
                Some(Value::Array(arr)) => arr
                    .iter()
                    .any(|branch| self.compare(&comparand(branch, options))),
                Some(single) => self.compare(&comparand(&single, options)),
                None => false,
            },
        }
    }

    fn compare(&self, value: &Value) -> bool {
        // A falsy comparand never matches, mirroring the resolver's
        // reading of falsy leaves as absent.
        if !value.is_truthy() {
            return false;
        }
        match self.operator {
            Operator::Eq => value.display_string().trim() == self.rule,
            Operator::Ne => value.display_string().trim() != self.rule,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
                // Numeric-only: a non-numeric operand on either side
                // never satisfies an ordering operator.
                let left = parse_leading_int(&value.display_string());
                let rule = parse_leading_int(&self.rule);
                match (left, rule) {
                    (Some(left), Some(rule)) => match self.operator {
                        Operator::Gt => left > rule,
                        Operator::Ge => left >= rule,
                        Operator::Lt => left < rule,
                        Operator::Le => left <= rule,
                        _ => false,
                    },
                    _ => false,
                }
            }
            Operator::Matches => match build_regex(&self.rule) {
                Some(regex) => regex.is_match(&value.display_string()),
                None => {
                    warn!(rule = %self.rule, "invalid condition pattern");
                    false
                }
            },
        }
    }
}

/// Look up the compared key on a candidate: the literal key first,
/// then its attribute-prefixed form; an element hit is dereferenced
/// through the value identifier.
fn extract_key(candidate: &Value, key: &str, options: &Options) -> Option<Value> {
    let obj = candidate.as_object()?;
    let hit = obj
        .get(key)
        .or_else(|| obj.get(&format!("{}{key}", options.attribute_identifier)))?;
    Some(comparand(hit, options))
}

fn comparand(value: &Value, options: &Options) -> Value {
    match value.as_object() {
        Some(obj) => obj
            .get(&options.value_identifier)
            .cloned()
            .unwrap_or(Value::Null),
        None => value.clone(),
    }
}

/// Parse a `/pattern/flags` regex literal: `i` and `m` are honored,
/// other flags ignored.
fn build_regex(rule: &str) -> Option<regex::Regex> {
    let mut pattern = rule;
    let mut case_insensitive = false;
    let mut multi_line = false;

    if let Some(stripped) = pattern.strip_prefix('/') {
        pattern = stripped;
        if let Some(slash) = pattern.rfind('/') {
            let flags = pattern.get(slash + 1..)?;
            case_insensitive = flags.contains('i');
            multi_line = flags.contains('m');
            pattern = pattern.get(..slash)?;
        }
    }

    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .multi_line(multi_line)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    fn candidate(pairs: &[(&str, Value)]) -> Value {
        let mut obj = Object::new();
        for (key, value) in pairs {
            obj.insert(*key, value.clone());
        }
        Value::Object(obj)
    }

    fn check(cand: &Value, raw: &str) -> bool {
        Condition::parse(raw)
            .is_some_and(|c| c.matches(cand, &Options::default()))
    }

    #[test]
    fn test_parse_shapes() {
        let cond = Condition::parse("k == 5");
        assert!(cond.is_some_and(|c| c.operator == Operator::Eq && c.rule == "5"));

        let cond = Condition::parse("a.b >= 10");
        assert!(cond.is_some_and(|c| c.subpath.is_some() && c.operator == Operator::Ge));

        assert!(Condition::parse("no operator here").is_none());
        assert!(Condition::parse("k ==").is_none());
    }

    #[test]
    fn test_equality_on_attribute_key() {
        let cand = candidate(&[("_k", Value::String("5".into()))]);
        assert!(check(&cand, "k == 5"));
        assert!(check(&cand, "k != 6"));
        assert!(!check(&cand, "k == 6"));
    }

    #[test]
    fn test_equality_on_element_text() {
        let mut inner = Object::new();
        inner.insert("$", Value::String("hello".into()));
        let cand = candidate(&[("name", Value::Object(inner))]);
        assert!(check(&cand, "name == hello"));
    }

    #[test]
    fn test_missing_key_never_matches() {
        let cand = candidate(&[("x", Value::String("1".into()))]);
        assert!(!check(&cand, "y == 1"));
        assert!(!check(&cand, "y != 1"));
    }

    #[test]
    fn test_ordering() {
        let cand = candidate(&[("n", Value::String("42".into()))]);
        assert!(check(&cand, "n > 10"));
        assert!(check(&cand, "n >= 42"));
        assert!(check(&cand, "n <= 42"));
        assert!(!check(&cand, "n < 42"));
    }

    #[test]
    fn test_ordering_with_typed_number() {
        let cand = candidate(&[("n", Value::Number(7))]);
        assert!(check(&cand, "n > 6"));
    }

    #[test]
    fn test_non_numeric_never_orders() {
        // Pinned: NaN never orders, not even against NaN.
        let cand = candidate(&[("n", Value::String("abc".into()))]);
        assert!(!check(&cand, "n > abc"));
        assert!(!check(&cand, "n >= abc"));
        assert!(!check(&cand, "n < abc"));
        assert!(!check(&cand, "n <= abc"));
    }

    #[test]
    fn test_regex_literal_with_flags() {
        let cand = candidate(&[("name", Value::String("Hello World".into()))]);
        assert!(check(&cand, "name =~ /hello/i"));
        assert!(!check(&cand, "name =~ /hello/"));
        assert!(check(&cand, "name =~ /^Hello/"));
    }

    #[test]
    fn test_invalid_regex_is_non_match() {
        let cand = candidate(&[("name", Value::String("x".into()))]);
        assert!(!check(&cand, "name =~ /((/"));
    }

    #[test]
    fn test_subpath_condition() {
        let mut id = Object::new();
        id.insert("$", Value::String("9".into()));
        let mut meta = Object::new();
        meta.insert("id", Value::Object(id));
        let cand = candidate(&[("meta", Value::Object(meta))]);
        assert!(check(&cand, "meta.id == 9"));
        assert!(check(&cand, "meta.id >= 9"));
        assert!(!check(&cand, "meta.id == 8"));
    }
}
