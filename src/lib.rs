//! whs: in-memory warehouse inventory
//!
//! Warehouses hold details, assemblies built from details, and mechanisms
//! built from assemblies. Each warehouse belongs to one login in a
//! [`CredentialStore`](crate::core::CredentialStore).

pub mod cli;
pub mod core;
pub mod entities;
