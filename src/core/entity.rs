//! Item trait - common interface for all inventory item kinds

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::identity::{ItemId, ProductKind};

/// Rendered in place of an empty component list
pub const UNSPECIFIED: &str = "unspecified";

/// Attributes shared by every inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub manufacturer: String,
    pub year: i32,
    /// Expected to be non-negative; not enforced
    pub price: f64,
}

impl ProductInfo {
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            year,
            price,
        }
    }
}

/// Common trait for Details, Assemblies and Mechanisms
pub trait Item: Serialize + DeserializeOwned {
    /// The kind of item this type represents
    const KIND: ProductKind;

    /// Get the item's unique ID
    fn id(&self) -> &ItemId;

    /// Get the shared attribute record
    fn info(&self) -> &ProductInfo;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Label and value of the kind-specific field (material or components)
    fn extra_field(&self) -> (&'static str, String);

    /// Get the item's name
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Human-readable, multi-line description of the item
    fn describe(&self) -> String {
        let info = self.info();
        let (label, value) = self.extra_field();
        format!(
            "{}: {}\n  manufacturer: {}\n  year: {}\n  price: {}\n  {}: {}",
            Self::KIND.label(),
            info.name,
            info.manufacturer,
            info.year,
            info.price,
            label,
            value
        )
    }
}

/// Join component names for display, or [`UNSPECIFIED`] when there are none
pub fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.into_iter().collect();
    if names.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        names.join(", ")
    }
}
