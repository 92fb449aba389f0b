//! Macros utilitarias para construir outcomes sin boilerplate.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use proc_core::{success, failure};
//!
//! Formas soportadas:
//! - success!("tag");                       // payload vacío
//! - success!("tag", { user: u, id: 3 });   // campos en orden de escritura
//! - failure!(...) con la misma gramática.

/// Construye un `Outcome` de kind Success con payload nombrado.
#[macro_export]
macro_rules! success {
    ($tag:expr) => {
        $crate::outcome::Outcome::success($tag, $crate::outcome::Payload::new())
    };
    ($tag:expr, { $($key:ident : $val:expr),+ $(,)? }) => {{
        let mut payload = $crate::outcome::Payload::new();
        $(
            payload.insert(stringify!($key).to_string(),
                           ::serde_json::to_value($val).expect("serialize outcome field"));
        )+
        $crate::outcome::Outcome::success($tag, payload)
    }};
}

/// Construye un `Outcome` de kind Failure con payload nombrado.
#[macro_export]
macro_rules! failure {
    ($tag:expr) => {
        $crate::outcome::Outcome::failure($tag, $crate::outcome::Payload::new())
    };
    ($tag:expr, { $($key:ident : $val:expr),+ $(,)? }) => {{
        let mut payload = $crate::outcome::Payload::new();
        $(
            payload.insert(stringify!($key).to_string(),
                           ::serde_json::to_value($val).expect("serialize outcome field"));
        )+
        $crate::outcome::Outcome::failure($tag, payload)
    }};
}
