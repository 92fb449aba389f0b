//! Registro de hooks alrededor de la llamada.
//!
//! Contrato de orden: los hooks before-call corren en orden de registro una
//! vez que la instancia está completamente ligada (dependencias e input
//! presentes); los after-call corren tras ligar el output. Un hook que
//! falla es fatal para la llamada (se propaga sin manejar).

use crate::errors::ProcessError;
use crate::schema::Record;

/// Vista de la instancia ligada que reciben los hooks.
pub struct HookContext<'a> {
    pub process: &'static str,
    pub dependencies: Option<&'a Record>,
    pub input: Option<&'a Record>,
}

type HookFn = Box<dyn FnMut(&HookContext<'_>) -> Result<(), ProcessError>>;

/// Hooks registrados de una instancia, en orden de registro.
#[derive(Default)]
pub struct HookSet {
    before: Vec<HookFn>,
    after: Vec<HookFn>,
}

impl HookSet {
    pub fn register_before(&mut self, hook: impl FnMut(&HookContext<'_>) -> Result<(), ProcessError> + 'static) {
        self.before.push(Box::new(hook));
    }

    pub fn register_after(&mut self, hook: impl FnMut(&HookContext<'_>) -> Result<(), ProcessError> + 'static) {
        self.after.push(Box::new(hook));
    }

    pub(crate) fn run_before(&mut self, ctx: &HookContext<'_>) -> Result<(), ProcessError> {
        for hook in &mut self.before {
            hook(ctx)?;
        }
        Ok(())
    }

    pub(crate) fn run_after(&mut self, ctx: &HookContext<'_>) -> Result<(), ProcessError> {
        for hook in &mut self.after {
            hook(ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
         .field("before", &self.before.len())
         .field("after", &self.after.len())
         .finish()
    }
}
