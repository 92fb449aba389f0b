//! Valor `Outcome`: unión etiquetada inmutable (Success | Failure).
//!
//! Invariantes:
//! - `tag` se fija una sola vez en la construcción.
//! - `value` (payload) queda congelado tras construir: los campos son
//!   privados y sólo hay accessors de lectura.
//! - El orden de inserción del payload se preserva (IndexMap).
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProcessError;

/// Payload nombrado de un outcome. Mapa ordenado campo -> dato JSON.
pub type Payload = IndexMap<String, Value>;

/// Polaridad del outcome. La identidad de negocio vive en el tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Resultado etiquetado de una llamada de proceso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    kind: OutcomeKind,
    tag: String,
    value: Payload,
}

impl Outcome {
    /// Construye un outcome de kind Success.
    pub fn success(tag: impl Into<String>, value: Payload) -> Self {
        Self { kind: OutcomeKind::Success,
               tag: tag.into(),
               value }
    }

    /// Construye un outcome de kind Failure.
    pub fn failure(tag: impl Into<String>, value: Payload) -> Self {
        Self { kind: OutcomeKind::Failure,
               tag: tag.into(),
               value }
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Tag simbólico de negocio (p. ej. `user_created`).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Payload congelado.
    pub fn value(&self) -> &Payload {
        &self.value
    }

    /// Acceso a un campo del payload; `None` si no existe.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Acceso estricto a un campo del payload.
    pub fn fetch(&self, key: &str) -> Result<&Value, ProcessError> {
        self.value
            .get(key)
            .ok_or_else(|| ProcessError::KeyNotFound { key: key.to_string() })
    }

    /// True si el tag coincide, sin importar la polaridad. Por convención los
    /// tags son únicos entre Success y Failure dentro de un proceso; esto no
    /// se verifica.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    pub fn is_failure(&self) -> bool {
        self.kind == OutcomeKind::Failure
    }

    /// Kind Success y tag coincidente.
    pub fn is_success_tagged(&self, tag: &str) -> bool {
        self.is_success() && self.is(tag)
    }

    /// Kind Failure y tag coincidente.
    pub fn is_failure_tagged(&self, tag: &str) -> bool {
        self.is_failure() && self.is(tag)
    }

    /// Despacho genérico de predicados por tag: acepta `user_created` o la
    /// forma consulta `user_created?` y responde igualdad de tag. Un único
    /// punto de resolución para tags abiertos; no existe un método por tag.
    pub fn tag_query(&self, query: &str) -> bool {
        self.is(query.strip_suffix('?').unwrap_or(query))
    }
}

impl std::ops::Index<&str> for Outcome {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        // Índice estricto, como IndexMap: clave ausente = panic.
        &self.value[key]
    }
}
