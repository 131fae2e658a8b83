//! Textual value coercion used by the tree builder and conditions

use crate::value::Value;

/// Convert a text value into a typed one: `true`/`false` become
/// booleans, `null`/`NaN`/`nil`/`undefined` become null (all
/// case-insensitive, whole-string), non-empty pure-digit strings
/// become integers. Everything else passes through unchanged,
/// including decimals like `"4.5"`.
pub fn detect_types(text: &str) -> Value {
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if ["null", "NaN", "nil", "undefined"]
        .iter()
        .any(|word| text.eq_ignore_ascii_case(word))
    {
        return Value::Null;
    }
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        // Digit runs too long for i64 stay strings.
        if let Ok(n) = text.parse::<i64>() {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

/// Integer coercion for ordering conditions, matching `parseInt`:
/// leading whitespace and sign, then the longest digit run. Anything
/// without a leading digit is non-numeric.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    digits
        .parse::<i64>()
        .ok()
        .map(|n| if negative { -n } else { n })
}
