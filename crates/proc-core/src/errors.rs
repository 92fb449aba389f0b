//! Errores de contrato del core (uso indebido del API, no fallos de negocio).
//!
//! Los fallos de negocio nunca se expresan aquí: viajan como `Outcome` de
//! kind Failure. Este enum cubre únicamente errores de programación
//! (slots re-asignados, llamadas re-entrantes, outcomes malformados).

use thiserror::Error;

/// Slot write-once de una instancia de proceso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Dependencies,
    Input,
    Output,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Dependencies => write!(f, "dependencies"),
            Slot::Input => write!(f, "input"),
            Slot::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProcessError {
    #[error("`{process}#{slot}` is already set; build a new instance to bind it again")]
    AlreadySet { process: &'static str, slot: Slot },
    #[error("`{process}` was already called; read `.output()` or build a new instance to call again")]
    AlreadyCalled { process: &'static str },
    #[error("`{process}` returned an invalid outcome: {detail}")]
    InvalidOutcome { process: &'static str, detail: String },
    #[error("`{process}::execute` must be implemented")]
    NotImplemented { process: &'static str },
    #[error("outcome payload has no key `{key}`")]
    KeyNotFound { key: String },
    #[error("hook failed for `{process}`: {detail}")]
    Hook { process: &'static str, detail: String },
}
