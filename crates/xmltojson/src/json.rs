//! Compact JSON rendering of the converted tree

use crate::value::Value;

/// Serialize a value as compact JSON
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", escape(s)),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_string).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(obj) => {
            let pairs: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("\"{}\":{}", escape(k), to_string(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Array, Object};

    #[test]
    fn test_scalars() {
        assert_eq!(to_string(&Value::Null), "null");
        assert_eq!(to_string(&Value::Bool(true)), "true");
        assert_eq!(to_string(&Value::Number(-3)), "-3");
        assert_eq!(to_string(&Value::String("hi".into())), "\"hi\"");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            to_string(&Value::String("a\"b\\c\nd".into())),
            "\"a\\\"b\\\\c\\nd\""
        );
    }

    #[test]
    fn test_nested() {
        let mut inner = Object::new();
        inner.insert("$", Value::String("x".into()));
        let mut obj = Object::new();
        obj.insert("a", Value::Object(inner));
        obj.insert("b", Value::Array(Array::from(vec![Value::Number(1), Value::Null])));
        assert_eq!(
            to_string(&Value::Object(obj)),
            "{\"a\":{\"$\":\"x\"},\"b\":[1,null]}"
        );
    }
}
