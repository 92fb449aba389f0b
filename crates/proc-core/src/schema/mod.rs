//! Motor de esquema para registros validados (Input / Dependencies).
//!
//! Rol en el flujo:
//! - Un `Schema` declara un conjunto fijo y ordenado de campos
//!   (`FieldSpec`): coerción, default, normalizadores pre-validación y
//!   reglas.
//! - `Record` envuelve un mapping crudo, lo normaliza una sola vez y fija
//!   su mapa de errores y su bandera de validez de por vida.
//! - El contrato que consume el ciclo de vida es únicamente
//!   `apply(raw) -> (atributos normalizados, errores por campo)`.

pub mod field;
pub mod merge;
pub mod record;
pub mod rules;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

pub use field::{Coerce, DefaultValue, FieldSpec, Normalize};
pub use merge::merge_json;
pub use record::{Record, RecordSource};
pub use rules::{codes, Rule};

/// Política ante claves crudas no declaradas en el esquema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Se descartan en silencio.
    #[default]
    Ignore,
    /// Producen un error `unknown_attribute` bajo la clave ofensora.
    Reject,
}

/// Esquema inmutable: campos declarados en orden + política de claves.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    unknown: UnknownKeys,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new(),
                        unknown: UnknownKeys::default() }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Aplica el esquema sobre un mapping crudo canonicalizado: coerción,
    /// defaults, normalización (orden de declaración, exactamente una vez) y
    /// luego reglas. Devuelve atributos normalizados y errores por campo.
    pub fn apply(&self, raw: &Map<String, Value>) -> (IndexMap<String, Value>, IndexMap<String, Vec<String>>) {
        let mut attributes: IndexMap<String, Value> = IndexMap::with_capacity(self.fields.len());
        let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();

        for spec in &self.fields {
            let mut codes_for_field: Vec<String> = Vec::new();
            let value = match raw.get(spec.name()) {
                Some(v) => spec.coerce_value(v, &mut codes_for_field),
                // El default sólo aplica cuando la clave está ausente.
                None => spec.default_value_materialized(),
            };
            let value = spec.normalize_value(value);

            for rule in spec.rules() {
                if let Some(code) = rule.check(&value) {
                    if !codes_for_field.iter().any(|c| c == code) {
                        codes_for_field.push(code.to_string());
                    }
                }
            }

            if !codes_for_field.is_empty() {
                errors.insert(spec.name().to_string(), codes_for_field);
            }
            attributes.insert(spec.name().to_string(), value);
        }

        if self.unknown == UnknownKeys::Reject {
            for key in raw.keys() {
                if self.field(key).is_none() {
                    errors.entry(key.clone())
                          .or_default()
                          .push(codes::UNKNOWN_ATTRIBUTE.to_string());
                }
            }
        }

        (attributes, errors)
    }
}

/// Builder encadenable de esquemas. `build` devuelve un `Arc` compartible:
/// la identidad del handle es la identidad del esquema (reuso de records).
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
    unknown: UnknownKeys,
}

impl SchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown = policy;
        self
    }

    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema { fields: self.fields,
                          unknown: self.unknown })
    }
}
