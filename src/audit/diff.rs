//! Top-level field diffs for audit updates

use serde_json::Value;

/// Describe the top-level fields that differ between two snapshots
///
/// Timestamps that change on every write are left out. Returns `None` when
/// nothing else changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();
    for (key, before_val) in before_obj {
        if key == "updated_at" {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if after_val != before_val => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }
    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
