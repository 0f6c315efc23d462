use serde_json::Value;
use std::io::{self, Read};

/// Attempt to read a form snapshot from stdin if data is being piped.
/// Accepts JSON or YAML. Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map_err(|yaml_err| format!("stdin is neither JSON ({json_err}) nor YAML ({yaml_err})"))?,
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepayment_core::amount_due::RawPaymentFields;

    #[test]
    fn test_empty_stdin_is_none() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_accepted() {
        let json = parse_piped(r#"{"workCompleted": "1,000"}"#).unwrap().unwrap();
        let yaml = parse_piped("workCompleted: \"1,000\"").unwrap().unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_yaml_numbers_and_nulls_become_field_text() {
        let value = parse_piped("workCompleted: 500000\nretentionPercent: 5\nvatPercent: ~\n")
            .unwrap()
            .unwrap();
        let raw: RawPaymentFields = serde_json::from_value(value).unwrap();
        assert_eq!(raw.work_completed, "500000");
        assert_eq!(raw.retention_percent, "5");
        assert_eq!(raw.vat_percent, "");
        assert_eq!(raw.parse().work_completed.to_string(), "500000");
    }
}
