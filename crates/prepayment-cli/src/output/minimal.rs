use serde_json::Value;

use super::format_scalar;

/// Fields printed by `--output minimal`, most important first.
const PRIORITY_KEYS: [&str; 5] = [
    "amount_due_display",
    "amount_in_words",
    "file_name",
    "index",
    "contractor",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                println!("{}", minimal_line(item));
            }
        }
        _ => println!("{}", minimal_line(value)),
    }
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return format_scalar(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_due_prefers_display_amount() {
        let value = json!({
            "result": {
                "amount_due": "350625",
                "amount_due_display": "350,625.00",
                "amount_in_words": "Three hundred and fifty thousand six hundred and twenty five naira",
            }
        });
        assert_eq!(minimal_line(&value), "350,625.00");
    }

    #[test]
    fn test_words_output() {
        let value = json!({ "amount": "5", "amount_in_words": "Five naira" });
        assert_eq!(minimal_line(&value), "Five naira");
    }
}
