//! Session state shared by the interactive shell and the script runner

use crate::core::{AuthError, Config, CredentialStore, Warehouse};

/// Owns the credential store for the lifetime of the process and tracks
/// which warehouse (if any) is logged in
#[derive(Debug)]
pub struct Session {
    store: CredentialStore,
    current: Option<String>,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            store: CredentialStore::new(),
            current: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register and log in as the new warehouse
    pub fn register(&mut self, login: &str, password: &str) -> Result<&mut Warehouse, AuthError> {
        let warehouse = self.store.register(login, password)?;
        self.current = Some(warehouse.name().to_string());
        Ok(warehouse)
    }

    /// Log in; a failed attempt keeps the previous session
    pub fn login(&mut self, login: &str, password: &str) -> Result<&mut Warehouse, AuthError> {
        let warehouse = self.store.login(login, password)?;
        self.current = Some(warehouse.name().to_string());
        Ok(warehouse)
    }

    /// End the session, returning the login that was active
    pub fn logout(&mut self) -> Option<String> {
        self.current.take()
    }

    pub fn current_login(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn warehouse(&self) -> Option<&Warehouse> {
        self.store.warehouse(self.current.as_deref()?)
    }

    pub fn warehouse_mut(&mut self) -> Option<&mut Warehouse> {
        let login = self.current.as_deref()?;
        self.store.warehouse_mut(login)
    }
}
