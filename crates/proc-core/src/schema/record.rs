//! Record validado: wrapper write-once sobre un mapping crudo.
//!
//! Invariantes:
//! - Se construye una sola vez por ejecución de proceso; la normalización
//!   corre exactamente una vez y el mapa de errores queda fijo.
//! - Las claves crudas se canonicalizan a string en la frontera de
//!   construcción (acceso indiferente: la representación de la clave del
//!   caller deja de importar aquí).
//! - Dos records nunca se fusionan; sólo los mappings crudos (ver `merge`).
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::rules::codes;
use super::Schema;

/// Registro validado contra un `Schema` (especializaciones: Input y
/// Dependencies de un proceso).
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    #[serde(skip)]
    schema: Arc<Schema>,
    attributes: IndexMap<String, Value>,
    errors: IndexMap<String, Vec<String>>,
}

impl Record {
    /// Construye y valida un record desde un mapping crudo. `Null` equivale
    /// a un mapping vacío; cualquier otro no-objeto produce un record
    /// inválido con error `base: not_a_map` (la construcción es total).
    pub fn new(schema: Arc<Schema>, raw: Value) -> Self {
        let (canonical, base_error) = canonical_map(raw);
        let (attributes, mut errors) = schema.apply(&canonical);
        if base_error {
            errors.insert("base".to_string(), vec![codes::NOT_A_MAP.to_string()]);
        }
        Self { schema,
               attributes,
               errors }
    }

    /// Resuelve una fuente hacia un record del esquema esperado. Un record
    /// ya construido con el esquema exacto (identidad del `Arc`) se reusa
    /// tal cual, sin re-validar; cualquier otra fuente construye uno nuevo.
    pub fn from_source(schema: Arc<Schema>, source: RecordSource) -> Self {
        match source {
            RecordSource::Record(record) if Arc::ptr_eq(record.schema(), &schema) => record,
            RecordSource::Record(record) => Self::new(schema, record.attributes_value()),
            RecordSource::Raw(raw) => Self::new(schema, raw),
            RecordSource::Empty => Self::new(schema, Value::Null),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errores por campo, en orden de declaración del esquema.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// True si el campo acumuló el código dado (análogo a consultar la
    /// lista de violaciones de un campo concreto).
    pub fn error_added(&self, field: &str, code: &str) -> bool {
        self.errors
            .get(field)
            .is_some_and(|codes| codes.iter().any(|c| c == code))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Atributos normalizados, en orden de declaración.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// Atributos como objeto JSON crudo: es la moneda de los merges de
    /// dependencias al spawnear instancias derivadas.
    pub fn attributes_value(&self) -> Value {
        json!(self.attributes)
    }

    /// Vista serializada `{attributes, errors, valid}` para incrustar el
    /// record en un payload de outcome.
    pub fn to_value(&self) -> Value {
        json!({
            "attributes": self.attributes,
            "errors": self.errors,
            "valid": self.is_valid(),
        })
    }
}

/// Fuente cruda para construir (o reusar) un record.
#[derive(Debug, Clone)]
pub enum RecordSource {
    Empty,
    Raw(Value),
    Record(Record),
}

impl From<Value> for RecordSource {
    fn from(raw: Value) -> Self {
        RecordSource::Raw(raw)
    }
}

impl From<Record> for RecordSource {
    fn from(record: Record) -> Self {
        RecordSource::Record(record)
    }
}

impl From<()> for RecordSource {
    fn from(_: ()) -> Self {
        RecordSource::Empty
    }
}

fn canonical_map(raw: Value) -> (Map<String, Value>, bool) {
    match raw {
        Value::Object(map) => (map, false),
        Value::Null => (Map::new(), false),
        _ => (Map::new(), true),
    }
}
