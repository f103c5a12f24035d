//! Core module - inventory model and the stores that own it

pub mod config;
pub mod credentials;
pub mod entity;
pub mod identity;
pub mod input;
pub mod shortid;
pub mod warehouse;

pub use config::Config;
pub use credentials::{AuthError, CredentialStore};
pub use entity::{Item, ProductInfo};
pub use identity::{IdParseError, ItemId, ProductKind};
pub use input::{InputError, ProductForm};
pub use shortid::ShortIdIndex;
pub use warehouse::{StockSummary, Warehouse, WarehouseError};
