use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["intrinsic_value", "base_case_value"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intrinsic_value_first() {
        let value = json!({
            "result": { "cash_flows": [], "intrinsic_value": "1446.21" }
        });
        assert_eq!(minimal_line(&value), "1446.21");
    }

    #[test]
    fn test_sensitivity_base_case() {
        let value = json!({ "result": { "matrix": [], "base_case_value": "12" } });
        assert_eq!(minimal_line(&value), "12");
    }

    #[test]
    fn test_fallback_to_first_field() {
        let value = json!({ "result": { "alpha": 1 } });
        assert_eq!(minimal_line(&value), "alpha: 1");
    }
}
