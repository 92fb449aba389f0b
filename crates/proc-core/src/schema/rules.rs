//! Reglas de validación y códigos de violación.
//!
//! Cada regla evalúa el valor ya coercionado y normalizado de un campo y
//! devuelve a lo sumo un código simbólico. Los códigos son estables: los
//! callers los inspeccionan vía `Record::error_added`.
use regex::Regex;
use serde_json::Value;

/// Códigos de violación estables.
pub mod codes {
    pub const BLANK: &str = "blank";
    pub const INVALID: &str = "invalid";
    pub const TOO_SHORT: &str = "too_short";
    pub const TOO_LONG: &str = "too_long";
    pub const INCLUSION: &str = "inclusion";
    pub const NOT_A_NUMBER: &str = "not_a_number";
    pub const UNKNOWN_ATTRIBUTE: &str = "unknown_attribute";
    pub const NOT_A_MAP: &str = "not_a_map";
}

#[derive(Debug, Clone)]
pub enum Rule {
    /// El valor no puede estar en blanco (null, string vacío post-trim,
    /// colección vacía). Código `blank`.
    Presence,
    /// El valor debe ser un string que matchee el patrón. Null y no-strings
    /// también violan la regla. Código `invalid`.
    Format { pattern: Regex },
    /// Longitud en caracteres de un string. Códigos `too_short`/`too_long`.
    /// No aplica a valores no-string.
    Length { min: Option<usize>, max: Option<usize> },
    /// El valor debe pertenecer al conjunto permitido. Código `inclusion`.
    Inclusion { allowed: Vec<Value> },
}

impl Rule {
    pub fn format(pattern: Regex) -> Self {
        Rule::Format { pattern }
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Rule::Length { min, max }
    }

    pub fn inclusion(allowed: Vec<Value>) -> Self {
        Rule::Inclusion { allowed }
    }

    /// Evalúa la regla; `Some(código)` si el valor la viola.
    pub fn check(&self, value: &Value) -> Option<&'static str> {
        match self {
            Rule::Presence => is_blank(value).then_some(codes::BLANK),
            Rule::Format { pattern } => match value {
                Value::String(s) if pattern.is_match(s) => None,
                _ => Some(codes::INVALID),
            },
            Rule::Length { min, max } => match value {
                Value::String(s) => {
                    let len = s.chars().count();
                    if min.is_some_and(|m| len < m) {
                        Some(codes::TOO_SHORT)
                    } else if max.is_some_and(|m| len > m) {
                        Some(codes::TOO_LONG)
                    } else {
                        None
                    }
                }
                _ => None,
            },
            Rule::Inclusion { allowed } => (!allowed.contains(value)).then_some(codes::INCLUSION),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presence_flags_null_and_blank_strings() {
        assert_eq!(Rule::Presence.check(&Value::Null), Some(codes::BLANK));
        assert_eq!(Rule::Presence.check(&json!("   ")), Some(codes::BLANK));
        assert_eq!(Rule::Presence.check(&json!("x")), None);
        assert_eq!(Rule::Presence.check(&json!(0)), None);
    }

    #[test]
    fn format_flags_null_and_mismatches() {
        let rule = Rule::format(Regex::new(r"^[a-z]+@[a-z]+\.[a-z]+$").unwrap());
        assert_eq!(rule.check(&json!("jane@mail.com")), None);
        assert_eq!(rule.check(&json!("bad")), Some(codes::INVALID));
        assert_eq!(rule.check(&Value::Null), Some(codes::INVALID));
    }

    #[test]
    fn length_bounds_only_apply_to_strings() {
        let rule = Rule::length(Some(3), Some(5));
        assert_eq!(rule.check(&json!("ab")), Some(codes::TOO_SHORT));
        assert_eq!(rule.check(&json!("abcdef")), Some(codes::TOO_LONG));
        assert_eq!(rule.check(&json!("abcd")), None);
        assert_eq!(rule.check(&Value::Null), None);
    }

    #[test]
    fn inclusion_checks_the_allowed_set() {
        let rule = Rule::inclusion(vec![json!("memory"), json!("null")]);
        assert_eq!(rule.check(&json!("memory")), None);
        assert_eq!(rule.check(&json!("postgres")), Some(codes::INCLUSION));
        assert_eq!(rule.check(&Value::Null), Some(codes::INCLUSION));
    }
}
