//! Item key extraction and loose key comparison.

use serde_json::{Number, Value};

/// Value of `key_field` on `item`, if the item is an object carrying it.
pub(crate) fn key_of<'a>(item: &'a Value, key_field: &str) -> Option<&'a Value> {
    item.as_object()?.get(key_field)
}

/// Loose key equality.
///
/// Equal JSON values match. Numbers match by numeric value regardless of
/// representation (`1` and `1.0`), and a number matches a string holding the
/// same number (`7` and `"7"`). Nothing else is coerced.
///
/// Integers are compared exactly; floating point is only used when one side
/// is not an integer, so distinct ids above 2^53 never collide.
pub fn keys_match(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (integer_of(x), integer_of(y)) {
            (Some(x), Some(y)) => x == y,
            _ => floats_match(x.as_f64(), y.as_f64()),
        },
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            let text = s.trim();
            match (integer_of(n), text.parse::<i128>()) {
                (Some(n), Ok(s)) => n == s,
                _ => floats_match(n.as_f64(), text.parse::<f64>().ok()),
            }
        }
        _ => false,
    }
}

fn integer_of(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn floats_match(x: Option<f64>, y: Option<f64>) -> bool {
    matches!((x, y), (Some(x), Some(y)) if x == y)
}

/// Position of the first item in `items` whose key loosely equals `key`.
pub(crate) fn position(items: &[Value], key_field: &str, key: &Value) -> Option<usize> {
    items
        .iter()
        .position(|item| key_of(item, key_field).is_some_and(|k| keys_match(k, key)))
}
