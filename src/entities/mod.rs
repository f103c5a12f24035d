//! Inventory item types
//!
//! - [`Detail`] - leaf parts with a material
//! - [`Assembly`] - built from details taken out of stock
//! - [`Mechanism`] - built from assemblies taken out of stock
//! - [`Product`] - closed variant over all three

pub mod assembly;
pub mod detail;
pub mod mechanism;
pub mod product;

pub use assembly::Assembly;
pub use detail::Detail;
pub use mechanism::Mechanism;
pub use product::Product;
