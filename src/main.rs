//! Demo del contrato de procesos: registro de usuarios end-to-end.
//!
//! Recorre los escenarios principales sobre `proc-adapters`:
//! - llamada exitosa (input normalizado, uuid generado),
//! - input inválido (short-circuit con errores por campo),
//! - dependencias inválidas (short-circuit antes del cuerpo),
//! - spawn derivado con merge de dependencias (`with`).
use proc_adapters::{InMemoryUserRepository, UserCreation};
use proc_core::{Instance, OutcomePattern, OutcomeView, Process};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    // Cargar variables de entorno desde .env si existe (antes del filtro de logs)
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .init();

    let repository = InMemoryUserRepository::new();

    // Escenario 1: creación exitosa.
    let mut creation = Instance::new(UserCreation::new(repository.clone()));
    creation.register_before_call(|ctx| {
              println!("[hook] before-call de {} con input ligado: {}",
                       ctx.process,
                       ctx.input.is_some());
              Ok(())
          });

    let outcome = creation.call(json!({
                              "name": "\tJohn     Doe \n",
                              "email": "   JOHN.doe@email.com",
                              "password": "123123123",
                          }))
                          .expect("user creation should complete");

    match outcome.view() {
        OutcomeView::Success { tag, value } => {
            println!("[ok] outcome `{tag}` user={}", value["user"]["email"]);
        }
        OutcomeView::Failure { tag, .. } => println!("[!!] fallo inesperado `{tag}`"),
    }
    println!("[ok] usuarios en el repo: {}", repository.count());

    // Matching por patrón: sólo el subconjunto pedido del payload.
    if let Some(bindings) = outcome.unpack(&OutcomePattern::success().tag("user_created").key("user")) {
        println!("[ok] uuid generado: {}", bindings.get("user").expect("bound")["uuid"]);
    }

    // Escenario 2: input inválido (sin efectos en el repo).
    let invalid = UserCreation::new(repository.clone()).run(json!({"name": "  ", "email": "bad"}))
                                                       .expect("call should complete");
    println!("[ok] input inválido -> `{}` (errores: {})",
             invalid.tag(),
             invalid["input"]["errors"]);

    // Escenario 3: dependencias inválidas cortan antes del cuerpo.
    let mut misconfigured = Instance::with_dependencies(UserCreation::new(repository.clone()),
                                                        json!({"repository": "postgres"}));
    let outcome = misconfigured.call(json!({"name": "Jane", "email": "jane@x.com", "password": "123123123"}))
                               .expect("call should complete");
    println!("[ok] deps inválidas -> `{}` ({})",
             outcome.tag(),
             outcome["dependencies"]["errors"]);

    // Escenario 4: spawn derivado con overrides (las claves del caller ganan).
    let mut strict = misconfigured.with(json!({"repository": "memory", "password_min_length": 12}));
    let outcome = strict.call(json!({"name": "Jane", "email": "jane@x.com", "password": "123123123"}))
                        .expect("call should complete");
    println!("[ok] instancia derivada -> `{}` (mínimo: {})",
             outcome.tag(),
             outcome.get("minimum").cloned().unwrap_or_default());
    println!("[ok] usuarios al final: {}", repository.count());
}
