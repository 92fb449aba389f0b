//! Instancia one-shot de un proceso: la máquina de estados del ciclo de
//! vida.
//!
//! Estados: Created -> DependenciesBound (en la construcción, si hay
//! esquema) -> Called (terminal, output presente). Invariantes:
//! - Cada slot (dependencies / input / output) se liga a lo sumo una vez;
//!   un re-bind es error de programación (`AlreadySet`), nunca un outcome.
//! - Una instancia llamada es terminal: volver a llamar es `AlreadyCalled`.
//!   Para ejecutar de nuevo se construye otra instancia (o se spawnea una
//!   derivada con `with`).
//! - El short-circuit por capas (dependencias -> input -> cuerpo) produce
//!   outcomes Failure ordinarios; los errores de este módulo señalan uso
//!   indebido del API.
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{ProcessError, Slot};
use crate::outcome::{Outcome, OutcomeBearer};
use crate::process::definition::{CallContext, Process};
use crate::process::hooks::{HookContext, HookSet};
use crate::schema::{merge_json, Record, RecordSource};

/// Contexto de ejecución ligado: dependencies + input + output, write-once.
pub struct Instance<P: Process> {
    process: P,
    dependencies: Option<Record>,
    input: Option<Record>,
    output: Option<Outcome>,
    hooks: HookSet,
}

impl<P: Process> Instance<P> {
    /// Instancia por defecto (dependencias desde un mapping vacío, si el
    /// proceso declara esquema).
    pub fn new(process: P) -> Self {
        Self::with_dependencies(process, ())
    }

    /// Instancia con dependencias crudas (o un record ya construido del
    /// esquema exacto, que se reusa tal cual). Transición
    /// Created -> DependenciesBound.
    pub fn with_dependencies(process: P, dependencies: impl Into<RecordSource>) -> Self {
        let record = process.dependencies_schema()
                            .map(|schema| Record::from_source(schema, dependencies.into()));
        Self { process,
               dependencies: record,
               input: None,
               output: None,
               hooks: HookSet::default() }
    }

    /// Spawnea una instancia nueva con los overrides del caller fusionados
    /// sobre los atributos crudos de dependencias de esta instancia (las
    /// claves del caller ganan). Esta instancia no se modifica.
    pub fn with(&self, overrides: Value) -> Instance<P>
        where P: Clone
    {
        let base = self.dependencies
                       .as_ref()
                       .map(|deps| deps.attributes_value())
                       .unwrap_or_else(|| json!({}));
        let merged = merge_json(&base, &overrides);
        Instance::with_dependencies(self.process.clone(), merged)
    }

    /// Ejecuta la llamada completa. Una sola vez por instancia.
    pub fn call(&mut self, arg: impl Into<RecordSource>) -> Result<&Outcome, ProcessError> {
        let name = self.process.name();
        if self.output.is_some() {
            return Err(ProcessError::AlreadyCalled { process: name });
        }

        let arg = arg.into();
        let raw_fallback = match self.process.input_schema() {
            Some(schema) => {
                let record = Record::from_source(schema, arg);
                self.bind_input(record)?;
                None
            }
            None => Some(match arg {
                RecordSource::Raw(value) => value,
                RecordSource::Record(record) => record.attributes_value(),
                RecordSource::Empty => Value::Null,
            }),
        };

        debug!(process = name, "process call started");

        let mut hooks = std::mem::take(&mut self.hooks);
        let produced: Result<Outcome, ProcessError> = (|| {
            hooks.run_before(&HookContext { process: name,
                                            dependencies: self.dependencies.as_ref(),
                                            input: self.input.as_ref() })?;

            if let Some(deps) = self.dependencies.as_ref() {
                if !deps.is_valid() {
                    debug!(process = name, "invalid dependencies, body skipped");
                    return Ok(crate::failure!("invalid_dependencies", { dependencies: deps.to_value() }));
                }
            }
            if let Some(input) = self.input.as_ref() {
                if !input.is_valid() {
                    debug!(process = name, "invalid input, body skipped");
                    return Ok(crate::failure!("invalid_input", { input: input.to_value() }));
                }
            }

            self.process.execute(CallContext { process: name,
                                               input: self.input.as_ref(),
                                               raw: raw_fallback.as_ref(),
                                               dependencies: self.dependencies.as_ref() })
        })();

        let bound = match produced {
            Ok(outcome) => {
                let binding = ensure_well_formed(&outcome, name).and_then(|()| self.bind_output(outcome));
                match binding {
                    Ok(()) => hooks.run_after(&HookContext { process: name,
                                                             dependencies: self.dependencies.as_ref(),
                                                             input: self.input.as_ref() }),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };
        self.hooks = hooks;
        bound?;

        let outcome = self.output.as_ref().expect("output bound after a completed call");
        debug!(process = name, tag = outcome.tag(), "process call finished");
        Ok(outcome)
    }

    /// Liga el slot de dependencias. Write-once.
    pub fn bind_dependencies(&mut self, record: Record) -> Result<(), ProcessError> {
        if self.dependencies.is_some() {
            return Err(ProcessError::AlreadySet { process: self.process.name(),
                                                  slot: Slot::Dependencies });
        }
        self.dependencies = Some(record);
        Ok(())
    }

    /// Liga el slot de input. Write-once (una re-entrada recursiva del call
    /// cae aquí).
    pub fn bind_input(&mut self, record: Record) -> Result<(), ProcessError> {
        if self.input.is_some() {
            return Err(ProcessError::AlreadySet { process: self.process.name(),
                                                  slot: Slot::Input });
        }
        self.input = Some(record);
        Ok(())
    }

    /// Liga el slot de output. Write-once; el guard se re-chequea aunque el
    /// call ya lo verificó al entrar.
    pub fn bind_output(&mut self, outcome: Outcome) -> Result<(), ProcessError> {
        if self.output.is_some() {
            return Err(ProcessError::AlreadySet { process: self.process.name(),
                                                  slot: Slot::Output });
        }
        self.output = Some(outcome);
        Ok(())
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn dependencies(&self) -> Option<&Record> {
        self.dependencies.as_ref()
    }

    /// Alias de `dependencies`.
    pub fn deps(&self) -> Option<&Record> {
        self.dependencies()
    }

    pub fn input(&self) -> Option<&Record> {
        self.input.as_ref()
    }

    /// Outcome ligado; estable por referencia tras la llamada.
    pub fn output(&self) -> Option<&Outcome> {
        self.output.as_ref()
    }

    /// Alias de `output`.
    pub fn result(&self) -> Option<&Outcome> {
        self.output()
    }

    pub fn into_output(self) -> Option<Outcome> {
        self.output
    }

    pub fn has_dependencies(&self) -> bool {
        self.dependencies.is_some()
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Registra un hook before-call (orden de registro).
    pub fn register_before_call(&mut self, hook: impl FnMut(&HookContext<'_>) -> Result<(), ProcessError> + 'static) {
        self.hooks.register_before(hook);
    }

    /// Registra un hook after-call (corre tras ligar el output).
    pub fn register_after_call(&mut self, hook: impl FnMut(&HookContext<'_>) -> Result<(), ProcessError> + 'static) {
        self.hooks.register_after(hook);
    }
}

// Las consultas sobre el output (is_success, tag_query, ...) vienen del
// contrato uniforme: la instancia sólo provee el outcome ligado.
impl<P: Process> OutcomeBearer for Instance<P> {
    fn bound_outcome(&self) -> Option<&Outcome> {
        self.output.as_ref()
    }
}

impl<P: Process> std::fmt::Debug for Instance<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.process.name())
         .field("dependencies", &self.dependencies)
         .field("input", &self.input)
         .field("output", &self.output)
         .finish()
    }
}

/// Chequeo residual del paso "el cuerpo devolvió un outcome válido": el
/// sistema de tipos ya garantiza que es un `Outcome`; queda verificar que
/// el tag sea un identificador snake_case no vacío.
fn ensure_well_formed(outcome: &Outcome, process: &'static str) -> Result<(), ProcessError> {
    let tag = outcome.tag();
    let mut chars = tag.chars();
    let head_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(ProcessError::InvalidOutcome { process,
                                           detail: format!("tag `{tag}` is not a snake_case identifier (outcome: {outcome:?})") })
    }
}
