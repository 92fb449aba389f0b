//! proc-adapters: procesos concretos de muestra sobre proc-core.
//!
//! Este crate provee:
//! - Un repositorio de usuarios en memoria (colaborador tipado, sin IO
//!   externo) con unicidad por email.
//! - `UserCreation`: el proceso de registro de usuarios completo, con
//!   esquema de input (normalización + reglas), esquema de dependencias y
//!   outcomes `user_created` / `email_already_taken` / `weak_password`.
//!
//! Nota: el core sólo conoce `Outcome`, `Record` y `Schema`; aquí se fija la
//! semántica de dominio y se deja al ciclo de vida el resto.

pub mod processes;
pub mod repo;

pub use processes::user_creation::UserCreation;
pub use repo::{InMemoryUserRepository, StoredUser};
