//! Contrato de negocio de un proceso.
//!
//! Implementaciones declaran (opcionalmente) esquemas de dependencias e
//! input y sobreescriben `execute`. Todo lo demás (binding, validación,
//! hooks, write-once) vive en `Instance` y no puede sombrearse.
use std::sync::Arc;

use serde_json::Value;

use crate::errors::ProcessError;
use crate::outcome::Outcome;
use crate::process::instance::Instance;
use crate::schema::{Record, RecordSource, Schema};

/// Último segmento del type name: `a::b::UserCreation` -> `UserCreation`.
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Definición de un proceso de negocio.
///
/// Los esquemas se devuelven como handles `Arc` compartidos: el mismo handle
/// en cada llamada, para que el reuso de records pueda comparar identidad.
pub trait Process: Sized {
    /// Nombre concreto, usado en errores y trazas.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Esquema de dependencias; `None` si el proceso no declara ninguna.
    fn dependencies_schema(&self) -> Option<Arc<Schema>> {
        None
    }

    /// Esquema de input; `None` si la llamada recibe el argumento crudo.
    fn input_schema(&self) -> Option<Arc<Schema>> {
        None
    }

    /// Cuerpo de negocio. Recibe input normalizado y dependencias ya
    /// validadas; devuelve exactamente un `Outcome`. Los fallos de negocio
    /// son outcomes Failure, nunca errores de este Result.
    fn execute(&self, ctx: CallContext<'_>) -> Result<Outcome, ProcessError> {
        let _ = ctx;
        Err(ProcessError::NotImplemented { process: self.name() })
    }

    /// Conveniencia de un solo uso: instancia por defecto, una llamada,
    /// outcome en propiedad.
    fn run(self, arg: impl Into<RecordSource>) -> Result<Outcome, ProcessError> {
        let mut instance = Instance::new(self);
        instance.call(arg)?;
        Ok(instance.into_output().expect("output bound after a completed call"))
    }
}

/// Contexto entregado al cuerpo de negocio (análogo a un contexto de
/// ejecución: sólo lectura, sin acceso a los slots).
pub struct CallContext<'a> {
    /// Nombre del proceso concreto.
    pub process: &'static str,
    /// Input validado, presente cuando el proceso declara esquema de input.
    pub input: Option<&'a Record>,
    /// Argumento crudo de la llamada, presente cuando NO hay esquema.
    pub raw: Option<&'a Value>,
    /// Dependencias validadas, si el proceso las declaró.
    pub dependencies: Option<&'a Record>,
}

impl CallContext<'_> {
    /// Atributo normalizado del input.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.input.and_then(|record| record.get(name))
    }

    /// Atributo normalizado de las dependencias.
    pub fn dep(&self, name: &str) -> Option<&Value> {
        self.dependencies.and_then(|record| record.get(name))
    }
}
