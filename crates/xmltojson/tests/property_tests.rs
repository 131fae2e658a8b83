//! Property-based tests for the conversion pipeline
//!
//! These verify structural invariants over generated documents:
//! 1. Sibling count: n same-named siblings always produce a sequence
//!    of length n (one produces a plain node)
//! 2. Text and document order are preserved through conversion
//! 3. The JSON writer never emits raw control characters

use proptest::prelude::*;
use xmltojson::{json, Converter, Options, Value};

fn tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,19}".prop_map(|s| s.trim_end().to_string())
}

proptest! {
    #[test]
    fn prop_sibling_count_matches_sequence_length(
        name in tag(),
        texts in prop::collection::vec(text(), 2..12),
    ) {
        let body: String = texts
            .iter()
            .map(|t| format!("<{name}>{t}</{name}>"))
            .collect();
        let c = Converter::from_str(&format!("<root>{body}</root>"), Options::default());

        let items = c.get(&format!("root.{name}")).and_then(Value::as_array);
        prop_assert_eq!(items.map(xmltojson::Array::len), Some(texts.len()));
    }

    #[test]
    fn prop_single_child_stays_plain(name in tag(), content in text()) {
        let c = Converter::from_str(
            &format!("<root><{name}>{content}</{name}></root>"),
            Options::default(),
        );
        let child = c.get(&format!("root.{name}"));
        prop_assert!(child.is_some_and(Value::is_object));
    }

    #[test]
    fn prop_text_preserved_in_order(
        texts in prop::collection::vec(text(), 1..8),
    ) {
        let body: String = texts.iter().map(|t| format!("<i>{t}</i>")).collect();
        let c = Converter::from_str(&format!("<root>{body}</root>"), Options::default());

        let read: Vec<String> = match texts.len() {
            1 => c
                .get("root.i.$")
                .map(Value::display_string)
                .into_iter()
                .collect(),
            _ => c
                .get("root.i")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_object()?.get("$").map(Value::display_string))
                        .collect()
                })
                .unwrap_or_default(),
        };
        prop_assert_eq!(read, texts);
    }

    // Zero is excluded: a falsy leaf reads as absent through `get`.
    #[test]
    fn prop_detected_integers_roundtrip(n in 1i64..1_000_000) {
        let options = Options {
            detect_types: true,
            ..Options::default()
        };
        let c = Converter::from_str(&format!("<root><n>{n}</n></root>"), options);
        prop_assert_eq!(c.get("root.n.$"), Some(&Value::Number(n)));
    }

    #[test]
    fn prop_json_writer_emits_no_raw_control_chars(s in "\\PC*") {
        let out = json::to_string(&Value::String(s));
        prop_assert!(out.chars().all(|c| c >= ' '));
        prop_assert!(out.starts_with('"') && out.ends_with('"'));
    }
}
