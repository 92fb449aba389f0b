//! proc-core: contrato de ejecución de procesos de negocio.
//!
//! Piezas, de hoja a raíz:
//! - `outcome`: unión etiquetada inmutable (Success | Failure) con payload
//!   ordenado, más el matcher estructural.
//! - `schema`: esquema declarativo + records validados write-once (Input /
//!   Dependencies) y la fusión de mappings crudos.
//! - `process`: definición de negocio (`Process`) e instancia one-shot
//!   (`Instance`) con el ciclo de vida completo.
//! - `errors`: errores de contrato (uso indebido del API); los fallos de
//!   negocio viajan como outcomes Failure, nunca por aquí.
pub mod errors;
pub mod outcome;
pub mod process;
pub mod schema;

pub use errors::{ProcessError, Slot};
pub use outcome::{Bindings, Outcome, OutcomeBearer, OutcomeKind, OutcomePattern, OutcomeView, Payload};
pub use process::{CallContext, HookContext, Instance, Process};
pub use schema::{merge_json, Coerce, FieldSpec, Normalize, Record, RecordSource, Rule, Schema, SchemaBuilder, UnknownKeys};

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use serde_json::json;

    use crate::success;

    use super::schema::codes;
    use super::*;

    fn greeting_input_schema() -> Arc<Schema> {
        Schema::builder().field(FieldSpec::string("name").normalize(Normalize::Squish)
                                                         .rule(Rule::Presence))
                         .build()
    }

    #[derive(Clone)]
    struct Greeting {
        input_schema: Arc<Schema>,
    }

    impl Greeting {
        fn new() -> Self {
            Self { input_schema: greeting_input_schema() }
        }
    }

    impl Process for Greeting {
        fn input_schema(&self) -> Option<Arc<Schema>> {
            Some(self.input_schema.clone())
        }

        fn execute(&self, ctx: CallContext<'_>) -> Result<Outcome, ProcessError> {
            let name = ctx.attr("name").and_then(|v| v.as_str()).unwrap_or_default();
            Ok(success!("greeted", { message: format!("hola {name}") }))
        }
    }

    // Proceso sin cuerpo: debe fallar con NotImplemented.
    struct Hollow;
    impl Process for Hollow {}

    #[test]
    fn run_executes_once_and_returns_the_outcome() {
        let outcome = Greeting::new().run(json!({"name": " Jane   Doe "})).expect("call should complete");

        assert!(outcome.is_success_tagged("greeted"));
        assert_eq!(outcome["message"], json!("hola Jane Doe"));
        assert_eq!(outcome.fetch("message").expect("present"), &json!("hola Jane Doe"));
        assert_eq!(outcome.fetch("missing"),
                   Err(ProcessError::KeyNotFound { key: "missing".to_string() }));
    }

    #[test]
    fn invalid_input_short_circuits_the_body() {
        let outcome = Greeting::new().run(json!({"name": "   "})).expect("call should complete");

        assert!(outcome.is_failure_tagged("invalid_input"));
        let input = outcome.get("input").expect("payload exposes the record");
        assert_eq!(input["valid"], json!(false));
        assert_eq!(input["errors"]["name"], json!([codes::BLANK]));
    }

    #[test]
    fn output_is_reference_stable_after_the_call() {
        let mut instance = Instance::new(Greeting::new());
        let tag = instance.call(json!({"name": "Jane"})).expect("call should complete").tag().to_string();

        let first = instance.output().expect("output bound") as *const Outcome;
        let second = instance.output().expect("output bound") as *const Outcome;
        assert_eq!(first, second);
        assert_eq!(tag, "greeted");
        assert!(instance.has_output());
        assert!(instance.tag_query("greeted?"));
        assert!(!instance.tag_query("missing?"));
    }

    #[test]
    fn a_called_instance_is_terminal() {
        let mut instance = Instance::new(Greeting::new());
        instance.call(json!({"name": "Jane"})).expect("first call should complete");

        let err = instance.call(json!({"name": "Jane"})).expect_err("second call must fail");
        assert_eq!(err,
                   ProcessError::AlreadyCalled { process: "Greeting" });
        assert!(err.to_string().contains("Greeting"));
    }

    #[test]
    fn output_slot_is_write_once() {
        let mut instance = Instance::new(Greeting::new());
        instance.call(json!({"name": "Jane"})).expect("call should complete");

        let err = instance.bind_output(success!("anything")).expect_err("rebind must fail");
        assert_eq!(err,
                   ProcessError::AlreadySet { process: "Greeting",
                                              slot: Slot::Output });
    }

    #[test]
    fn missing_body_is_a_not_implemented_error() {
        let err = Hollow.run(json!({})).expect_err("base body must not run");
        assert_eq!(err, ProcessError::NotImplemented { process: "Hollow" });
    }

    #[test]
    fn malformed_tags_are_invalid_outcomes() {
        struct BadTag;
        impl Process for BadTag {
            fn execute(&self, _ctx: CallContext<'_>) -> Result<Outcome, ProcessError> {
                Ok(success!("Not A Tag"))
            }
        }

        let err = BadTag.run(json!({})).expect_err("tag must be rejected");
        match err {
            ProcessError::InvalidOutcome { process: "BadTag", detail } => {
                assert!(detail.contains("Not A Tag"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn before_hooks_run_in_registration_order_with_the_bound_instance() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let mut instance = Instance::new(Greeting::new());
        let first = seen.clone();
        instance.register_before_call(move |ctx| {
            let name = ctx.input
                          .and_then(|input| input.get("name"))
                          .and_then(|v| v.as_str())
                          .unwrap_or_default()
                          .to_string();
            first.borrow_mut().push(format!("first:{name}"));
            Ok(())
        });
        let second = seen.clone();
        instance.register_before_call(move |_ctx| {
            second.borrow_mut().push("second".to_string());
            Ok(())
        });
        let third = seen.clone();
        instance.register_after_call(move |_ctx| {
            third.borrow_mut().push("after".to_string());
            Ok(())
        });

        instance.call(json!({"name": " Jane  Doe "})).expect("call should complete");

        // El hook ve el input ya ligado y normalizado.
        assert_eq!(*seen.borrow(),
                   vec!["first:Jane Doe".to_string(), "second".to_string(), "after".to_string()]);
    }

    #[test]
    fn failing_before_hook_aborts_without_binding_output() {
        let mut instance = Instance::new(Greeting::new());
        instance.register_before_call(|ctx| {
            Err(ProcessError::Hook { process: ctx.process,
                                     detail: "boom".to_string() })
        });

        let err = instance.call(json!({"name": "Jane"})).expect_err("hook failure is fatal");
        assert!(matches!(err, ProcessError::Hook { .. }));
        assert!(!instance.has_output());
        // El input quedó ligado: el slot es write-once, la instancia está
        // envenenada para una segunda llamada.
        assert!(instance.has_input());
        let err = instance.call(json!({"name": "Jane"})).expect_err("input rebind must fail");
        assert_eq!(err,
                   ProcessError::AlreadySet { process: "Greeting",
                                              slot: Slot::Input });
    }

    #[test]
    fn processes_without_input_schema_receive_the_raw_argument() {
        struct Echo;
        impl Process for Echo {
            fn execute(&self, ctx: CallContext<'_>) -> Result<Outcome, ProcessError> {
                let raw = ctx.raw.cloned().unwrap_or_default();
                Ok(success!("echoed", { raw: raw }))
            }
        }

        let mut instance = Instance::new(Echo);
        let outcome = instance.call(json!({"anything": [1, 2, 3]})).expect("call should complete");
        assert_eq!(outcome["raw"], json!({"anything": [1, 2, 3]}));
        assert!(!instance.has_input());
    }

    #[test]
    fn exact_schema_input_records_are_reused() {
        let process = Greeting::new();
        let schema = process.input_schema().expect("schema declared");
        let record = Record::new(schema, json!({"name": "Jane"}));

        let mut instance = Instance::new(process);
        instance.call(record).expect("call should complete");
        assert_eq!(instance.input().and_then(|r| r.get("name")), Some(&json!("Jane")));
    }
}
