use serde_json::{Map, Value};

const NULL_TOKENS: [&str; 4] = ["null", "none", "na", "n/a"];

/// Null-equivalence for extracted field values: JSON null, empty or
/// whitespace-only strings, and the usual null spellings, case-insensitive.
/// Numbers and booleans always count as present (false is a real answer).
pub fn is_nullish(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let trimmed = s.trim().to_lowercase();
            trimmed.is_empty() || NULL_TOKENS.contains(&trimmed.as_str())
        }
        _ => false,
    }
}

/// Field-level recto/verso merge over the key union of both faces.
///
/// The front value survives unless it is null-equivalent and the back
/// offers a real one; a null-equivalent back value never overwrites
/// anything.
pub fn merge_fields(front: &Map<String, Value>, back: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = front.clone();
    for (key, back_value) in back {
        let front_missing = merged.get(key).map(is_nullish).unwrap_or(true);
        if front_missing && !is_nullish(back_value) {
            merged.insert(key.clone(), back_value.clone());
        }
    }
    merged
}
