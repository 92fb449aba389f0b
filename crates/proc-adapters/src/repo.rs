//! Repositorio de usuarios en memoria.
//!
//! Deliberadamente single-threaded (`Rc<RefCell<..>>`): el contrato del core
//! es síncrono y sin estado compartido entre instancias, así que el handle
//! clonado comparte el mismo almacén dentro de un caller lógico.
use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usuario persistido en memoria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Almacén en memoria con unicidad por email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Rc<RefCell<Vec<StoredUser>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.users.borrow().len()
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users.borrow().iter().any(|u| u.email == email)
    }

    pub fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        self.users.borrow().iter().find(|u| u.email == email).cloned()
    }

    /// Inserta sin chequear unicidad; el proceso decide antes de llegar acá.
    pub fn insert(&self, uuid: String, name: String, email: String) -> StoredUser {
        let user = StoredUser { uuid,
                                name,
                                email,
                                created_at: Utc::now() };
        self.users.borrow_mut().push(user.clone());
        user
    }
}
