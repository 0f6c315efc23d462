use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token a form uses to mark a field as deliberately empty.
pub const NIL_TOKEN: &str = "nil";

/// Outcome of leniently parsing one free-form numeric field.
///
/// Every variant carries a usable number: anything other than `Parsed`
/// resolves to zero. The variant only records why, so callers can warn
/// about garbled input without rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Parsed(Decimal),
    Blank,
    Nil,
    Unparsable(String),
    /// A well-formed number too large (or too fine) for 96-bit decimal money
    OutOfRange(String),
}

impl FieldValue {
    pub fn value(&self) -> Decimal {
        match self {
            FieldValue::Parsed(v) => *v,
            _ => Decimal::ZERO,
        }
    }

    /// True when the field held text that was neither a number, blank, nor `nil`.
    pub fn is_unparsable(&self) -> bool {
        matches!(self, FieldValue::Unparsable(_))
    }

    /// Warning text for a field that fell back to zero on bad input.
    pub fn warning(&self, field: &str) -> Option<String> {
        match self {
            FieldValue::Unparsable(text) => {
                Some(format!("{field}: '{text}' is not a number; treated as 0"))
            }
            FieldValue::OutOfRange(text) => Some(format!(
                "{field}: '{text}' is out of range for decimal money; treated as 0"
            )),
            _ => None,
        }
    }
}

/// Strip thousands separators and percent signs, trim, lower-case.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Parse a form field, reporting why it defaulted if it did.
pub fn parse_field_checked(raw: &str) -> FieldValue {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return FieldValue::Blank;
    }
    if cleaned == NIL_TOKEN {
        return FieldValue::Nil;
    }

    if let Ok(value) = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned)) {
        return FieldValue::Parsed(value);
    }

    // Syntactically a finite number, but not representable as Decimal.
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => FieldValue::OutOfRange(raw.trim().to_string()),
        _ => FieldValue::Unparsable(raw.trim().to_string()),
    }
}

/// Parse a form field as a number, treating blank, `nil` and garbage as zero.
///
/// `"1,000,000"` -> 1000000, `"7.5%"` -> 7.5, `"NIL"` -> 0, `"abc"` -> 0.
pub fn parse_field(raw: &str) -> Decimal {
    parse_field_checked(raw).value()
}

struct LenientText;

impl<'de> Visitor<'de> for LenientText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
        deserialize_lenient_text(d)
    }
}

/// Serde helper for form fields: accept a string, number, boolean or null
/// and keep it as text (null becomes blank) for lenient parsing later.
pub fn deserialize_lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    d.deserialize_any(LenientText)
}
