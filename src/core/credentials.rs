//! Credential store - registration and login
//!
//! Passwords are kept and compared in plaintext. Hashing, rate limiting and
//! session expiry are out of scope for this tool.

use miette::Diagnostic;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::warehouse::Warehouse;

/// Errors raised by registration and login
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum AuthError {
    #[error("login '{0}' is already taken")]
    #[diagnostic(code(whs::auth::duplicate_login), help("pick another login or log in instead"))]
    DuplicateLogin(String),

    #[error("wrong login or password")]
    #[diagnostic(code(whs::auth::invalid_credentials))]
    InvalidCredentials,

    #[error("{0} must not be empty")]
    #[diagnostic(code(whs::auth::empty_field), help("fill in all fields"))]
    EmptyField(&'static str),
}

#[derive(Debug)]
struct Account {
    password: String,
    warehouse: Warehouse,
}

/// Owns every registered warehouse together with its password
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: BTreeMap<String, Account>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new warehouse and return it as the logged-in subject
    pub fn register(&mut self, login: &str, password: &str) -> Result<&mut Warehouse, AuthError> {
        if login.trim().is_empty() {
            return Err(AuthError::EmptyField("login"));
        }
        if password.trim().is_empty() {
            return Err(AuthError::EmptyField("password"));
        }
        if self.accounts.contains_key(login) {
            warn!(login, "registration rejected: login exists");
            return Err(AuthError::DuplicateLogin(login.to_string()));
        }

        info!(login, "registered warehouse");
        let account = self
            .accounts
            .entry(login.to_string())
            .or_insert_with(|| Account {
                password: password.to_string(),
                warehouse: Warehouse::new(login),
            });
        Ok(&mut account.warehouse)
    }

    /// Return the warehouse for `login` when the password matches exactly
    pub fn login(&mut self, login: &str, password: &str) -> Result<&mut Warehouse, AuthError> {
        match self.accounts.get_mut(login) {
            Some(account) if account.password == password => {
                info!(login, "logged in");
                Ok(&mut account.warehouse)
            }
            _ => {
                warn!(login, "login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Warehouse of a session that has already authenticated
    pub fn warehouse(&self, login: &str) -> Option<&Warehouse> {
        self.accounts.get(login).map(|a| &a.warehouse)
    }

    /// Mutable warehouse of a session that has already authenticated
    pub fn warehouse_mut(&mut self, login: &str) -> Option<&mut Warehouse> {
        self.accounts.get_mut(login).map(|a| &mut a.warehouse)
    }

    pub fn contains(&self, login: &str) -> bool {
        self.accounts.contains_key(login)
    }

    /// Registered logins, sorted
    pub fn logins(&self) -> impl Iterator<Item = &str> + '_ {
        self.accounts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
