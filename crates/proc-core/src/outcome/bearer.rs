//! Contrato uniforme de consulta para portadores de un outcome.
//!
//! Un portador puede tener (o todavía no tener) un outcome ligado. Las
//! consultas se implementan una sola vez acá y se componen por delegación:
//! el portador sólo provee `bound_outcome`. Sin outcome, toda consulta
//! responde un false definitivo, nunca un error.

use super::value::Outcome;

pub trait OutcomeBearer {
    /// Outcome ligado, si ya existe.
    fn bound_outcome(&self) -> Option<&Outcome>;

    fn is_success(&self) -> bool {
        self.bound_outcome().is_some_and(|o| o.is_success())
    }

    fn is_failure(&self) -> bool {
        self.bound_outcome().is_some_and(|o| o.is_failure())
    }

    fn is_success_tagged(&self, tag: &str) -> bool {
        self.bound_outcome().is_some_and(|o| o.is_success_tagged(tag))
    }

    fn is_failure_tagged(&self, tag: &str) -> bool {
        self.bound_outcome().is_some_and(|o| o.is_failure_tagged(tag))
    }

    /// Igualdad de tag sin importar la polaridad.
    fn outcome_tagged(&self, tag: &str) -> bool {
        self.bound_outcome().is_some_and(|o| o.is(tag))
    }

    /// Despacho genérico de predicados por tag; acepta la forma consulta
    /// (`user_created?`).
    fn tag_query(&self, query: &str) -> bool {
        self.bound_outcome().is_some_and(|o| o.tag_query(query))
    }
}
