//! Registro de usuarios: el proceso de referencia del repo.
//!
//! - Input: `uuid` generado por default, `name` con squish, `email`
//!   trim+lowercase con formato, `password` con presencia. La normalización
//!   corre antes de las reglas, en orden de declaración.
//! - Dependencias: selector de backend (`repository`, por ahora sólo
//!   `memory`) y `password_min_length` con default. Una dependencia
//!   inválida corta la llamada antes del cuerpo (`invalid_dependencies`).
//! - Outcomes de negocio: `user_created`, `email_already_taken`,
//!   `weak_password`.
use std::sync::Arc;

use once_cell::sync::Lazy;
use proc_core::{failure, success};
use proc_core::{CallContext, FieldSpec, Normalize, Outcome, Process, ProcessError, Rule, Schema};
use regex::Regex;
use serde_json::json;
use uuid::Uuid;

use crate::repo::InMemoryUserRepository;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

static UUID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").expect("uuid regex"));

// Handles compartidos: el mismo Arc en cada llamada, para que el ciclo de
// vida pueda reusar records ya construidos con el esquema exacto.
static INPUT_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Schema::builder().field(FieldSpec::string("uuid").default_with(|| json!(Uuid::new_v4().to_string()))
                                                     .normalize(Normalize::Trim)
                                                     .normalize(Normalize::Lowercase)
                                                     .rule(Rule::format(UUID_REGEX.clone())))
                     .field(FieldSpec::string("name").normalize(Normalize::Squish)
                                                     .rule(Rule::Presence))
                     .field(FieldSpec::string("email").normalize(Normalize::Trim)
                                                      .normalize(Normalize::Lowercase)
                                                      .rule(Rule::Presence)
                                                      .rule(Rule::format(EMAIL_REGEX.clone())))
                     .field(FieldSpec::string("password").rule(Rule::Presence))
                     .build()
});

static DEPENDENCIES_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Schema::builder().field(FieldSpec::string("repository").default_value(json!("memory"))
                                                           .rule(Rule::Presence)
                                                           .rule(Rule::inclusion(vec![json!("memory")])))
                     .field(FieldSpec::integer("password_min_length").default_value(json!(8)))
                     .build()
});

/// Proceso de creación de usuarios sobre el repositorio en memoria.
#[derive(Debug, Clone, Default)]
pub struct UserCreation {
    pub repository: InMemoryUserRepository,
}

impl UserCreation {
    pub fn new(repository: InMemoryUserRepository) -> Self {
        Self { repository }
    }
}

impl Process for UserCreation {
    fn dependencies_schema(&self) -> Option<Arc<Schema>> {
        Some(DEPENDENCIES_SCHEMA.clone())
    }

    fn input_schema(&self) -> Option<Arc<Schema>> {
        Some(INPUT_SCHEMA.clone())
    }

    fn execute(&self, ctx: CallContext<'_>) -> Result<Outcome, ProcessError> {
        let uuid = ctx.attr("uuid").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let name = ctx.attr("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let email = ctx.attr("email").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let password = ctx.attr("password").and_then(|v| v.as_str()).unwrap_or_default();

        let min_length = ctx.dep("password_min_length").and_then(|v| v.as_i64()).unwrap_or(8) as usize;
        if password.chars().count() < min_length {
            return Ok(failure!("weak_password", { minimum: min_length }));
        }

        if self.repository.email_taken(&email) {
            return Ok(failure!("email_already_taken", { email: email }));
        }

        let user = self.repository.insert(uuid, name, email);
        Ok(success!("user_created", { user: user }))
    }
}
