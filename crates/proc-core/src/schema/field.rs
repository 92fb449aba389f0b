//! Especificación de un campo: coerción, default, normalizadores y reglas.
use serde_json::Value;

use super::rules::{codes, Rule};

/// Tipo declarado del campo. La coerción es permisiva para strings y
/// estricta para numéricos (fallo de cast = código `not_a_number`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    String,
    Integer,
    Float,
    Boolean,
}

/// Transform pre-validación. Sólo actúa sobre strings; corre en orden de
/// declaración, exactamente una vez, antes de evaluar reglas. Es el único
/// punto donde los campos de un record mutan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Recorta espacios en los extremos.
    Trim,
    /// Trim + colapsa espacios internos consecutivos a uno.
    Squish,
    Lowercase,
    Uppercase,
}

impl Normalize {
    fn apply(self, s: &str) -> String {
        match self {
            Normalize::Trim => s.trim().to_string(),
            Normalize::Squish => s.split_whitespace().collect::<Vec<_>>().join(" "),
            Normalize::Lowercase => s.to_lowercase(),
            Normalize::Uppercase => s.to_uppercase(),
        }
    }
}

/// Default de un campo ausente en el mapping crudo.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Static(Value),
    /// Generado por llamada (p. ej. un UUID nuevo por record).
    Generated(fn() -> Value),
}

/// Campo declarado de un esquema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    coerce: Coerce,
    default: Option<DefaultValue>,
    normalizers: Vec<Normalize>,
    rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, coerce: Coerce) -> Self {
        Self { name: name.into(),
               coerce,
               default: None,
               normalizers: Vec::new(),
               rules: Vec::new() }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Coerce::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, Coerce::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, Coerce::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, Coerce::Boolean)
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Static(value));
        self
    }

    pub fn default_with(mut self, generate: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Generated(generate));
        self
    }

    /// Registra un paso de normalización pre-validación.
    pub fn normalize(mut self, step: Normalize) -> Self {
        self.normalizers.push(step);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn default_value_materialized(&self) -> Value {
        match &self.default {
            Some(DefaultValue::Static(v)) => v.clone(),
            Some(DefaultValue::Generated(f)) => f(),
            None => Value::Null,
        }
    }

    /// Coerción del valor crudo al tipo declarado. Un cast numérico o
    /// booleano fallido deja `Null` y registra su código.
    pub(crate) fn coerce_value(&self, raw: &Value, out_codes: &mut Vec<String>) -> Value {
        match (self.coerce, raw) {
            (_, Value::Null) => Value::Null,
            (Coerce::String, Value::String(_)) => raw.clone(),
            (Coerce::String, Value::Number(n)) => Value::String(n.to_string()),
            (Coerce::String, Value::Bool(b)) => Value::String(b.to_string()),
            // Estructuras compuestas quedan tal cual; las reglas de formato
            // las marcarán si el campo las rechaza.
            (Coerce::String, other) => other.clone(),
            (Coerce::Integer, Value::Number(n)) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => match n.as_f64() {
                    Some(f) => Value::from(f as i64),
                    None => Self::cast_failure(out_codes),
                },
            },
            (Coerce::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Value::from(i),
                Err(_) => Self::cast_failure(out_codes),
            },
            (Coerce::Integer, _) => Self::cast_failure(out_codes),
            (Coerce::Float, Value::Number(n)) => match n.as_f64() {
                Some(f) => Value::from(f),
                None => Self::cast_failure(out_codes),
            },
            (Coerce::Float, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(f) => Value::from(f),
                Err(_) => Self::cast_failure(out_codes),
            },
            (Coerce::Float, _) => Self::cast_failure(out_codes),
            (Coerce::Boolean, Value::Bool(_)) => raw.clone(),
            (Coerce::Boolean, Value::String(s)) => match s.trim() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => Self::boolean_cast_failure(out_codes),
            },
            (Coerce::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(1) => Value::Bool(true),
                Some(0) => Value::Bool(false),
                _ => Self::boolean_cast_failure(out_codes),
            },
            (Coerce::Boolean, _) => Self::boolean_cast_failure(out_codes),
        }
    }

    pub(crate) fn normalize_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) => {
                let mut current = s;
                for step in &self.normalizers {
                    current = step.apply(&current);
                }
                Value::String(current)
            }
            other => other,
        }
    }

    fn cast_failure(out_codes: &mut Vec<String>) -> Value {
        out_codes.push(codes::NOT_A_NUMBER.to_string());
        Value::Null
    }

    fn boolean_cast_failure(out_codes: &mut Vec<String>) -> Value {
        out_codes.push(codes::INVALID.to_string());
        Value::Null
    }
}
