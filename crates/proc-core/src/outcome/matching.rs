//! Matcher estructural de outcomes.
//!
//! Tres idiomas equivalentes en poder:
//! 1. Posicional: `Outcome::view()` devuelve un enum prestado que se
//!    destructura con `match` nativo (kind + par `(tag, payload)`).
//! 2. Por nombre con kind: `OutcomePattern::success()/failure()` refinado con
//!    `.tag(..)` y `.key(..)`, resuelto con `matches`/`unpack`.
//! 3. Plano (kind-agnóstico): `OutcomePattern::any()` con los mismos
//!    refinamientos, para call-sites que sólo miran el tag.
//!
//! La extracción de un subconjunto de claves acepta payloads con claves
//! extra (shape matching estilo duck). Una clave pedida y ausente no hace
//! match: `matches` da false y `unpack` da `None`, nunca panic.
use indexmap::IndexMap;
use serde_json::Value;

use super::value::{Outcome, OutcomeKind, Payload};

/// Vista prestada para destructuración posicional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutcomeView<'a> {
    Success { tag: &'a str, value: &'a Payload },
    Failure { tag: &'a str, value: &'a Payload },
}

impl Outcome {
    /// Vista posicional del outcome, apta para `match`.
    pub fn view(&self) -> OutcomeView<'_> {
        match self.kind() {
            OutcomeKind::Success => OutcomeView::Success { tag: self.tag(),
                                                          value: self.value() },
            OutcomeKind::Failure => OutcomeView::Failure { tag: self.tag(),
                                                          value: self.value() },
        }
    }

    /// True si el outcome satisface el patrón completo.
    pub fn matches(&self, pattern: &OutcomePattern) -> bool {
        self.unpack(pattern).is_some()
    }

    /// Destructura según el patrón: devuelve los bindings pedidos o `None`
    /// si algún componente no coincide (fall through).
    pub fn unpack(&self, pattern: &OutcomePattern) -> Option<Bindings<'_>> {
        if let Some(kind) = pattern.kind {
            if self.kind() != kind {
                return None;
            }
        }
        if let Some(tag) = &pattern.tag {
            if !self.is(tag) {
                return None;
            }
        }
        let mut fields: IndexMap<&str, &Value> = IndexMap::new();
        for key in &pattern.keys {
            let (k, value) = self.value().get_key_value(key.as_str())?;
            fields.insert(k.as_str(), value);
        }
        Some(Bindings { kind: self.kind(),
                        tag: self.tag(),
                        fields })
    }
}

/// Patrón declarativo sobre kind, tag y claves del payload.
///
/// Cada componente es opcional: un patrón vacío (`any()`) matchea cualquier
/// outcome.
#[derive(Debug, Clone, Default)]
pub struct OutcomePattern {
    kind: Option<OutcomeKind>,
    tag: Option<String>,
    keys: Vec<String>,
}

impl OutcomePattern {
    /// Patrón kind-agnóstico (idioma plano).
    pub fn any() -> Self {
        Self::default()
    }

    /// Exige kind Success.
    pub fn success() -> Self {
        Self { kind: Some(OutcomeKind::Success),
               ..Self::default() }
    }

    /// Exige kind Failure.
    pub fn failure() -> Self {
        Self { kind: Some(OutcomeKind::Failure),
               ..Self::default() }
    }

    /// Exige igualdad de tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Exige presencia de la clave en el payload y la extrae en los
    /// bindings. Claves extra del payload no afectan el match.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Variante plural de `key`.
    pub fn keys(mut self, keys: &[&str]) -> Self {
        for k in keys {
            self.keys.push((*k).to_string());
        }
        self
    }
}

/// Resultado de una destructuración por patrón: kind, tag y el subconjunto
/// de campos pedidos, en el orden en que el patrón los declaró.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<'a> {
    pub kind: OutcomeKind,
    pub tag: &'a str,
    pub fields: IndexMap<&'a str, &'a Value>,
}

impl<'a> Bindings<'a> {
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).copied()
    }
}
