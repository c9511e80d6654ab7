// Utility functions

/// Player identifier as used for member keys: hyphens removed.
pub fn member_key(uuid: &str) -> String {
    uuid.replace('-', "")
}

/// Keeps only `[A-Za-z0-9_-]`, so the value is safe inside a file name.
pub fn sanitize_file_component(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_key_strips_hyphens() {
        assert_eq!(
            member_key("069a79f4-44e9-4726-a5be-fca90e38aaf5"),
            "069a79f444e94726a5befca90e38aaf5"
        );
    }

    #[test]
    fn sanitize_drops_path_characters() {
        assert_eq!(sanitize_file_component("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_file_component("abc-DEF_123"), "abc-DEF_123");
    }

    #[test]
    fn truthiness_matches_json_scripts() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(2.5)));
    }
}
