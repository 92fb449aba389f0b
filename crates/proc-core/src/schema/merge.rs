//! Fusión determinista de mappings crudos.
//!
//! Los records nunca se fusionan entre sí: al spawnear una instancia
//! derivada se fusionan los *atributos crudos* de dependencias previas con
//! los overrides del caller, y del resultado se construye un record nuevo.

use serde_json::Value;

/// Merge shallow: las claves de `overrides` reemplazan a las de `base`
/// cuando ambos son objetos. Si alguno no es objeto, `overrides` gana.
pub fn merge_json(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(a), Value::Object(b)) => {
            let mut out = a.clone();
            for (k, v) in b.iter() {
                out.insert(k.clone(), v.clone());
            }
            Value::Object(out)
        }
        (_, other) => other.clone(),
    }
}
