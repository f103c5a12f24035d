//! Assembly entity - products built from details

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{join_names, Item, ProductInfo};
use crate::core::identity::{ItemId, ProductKind};
use crate::entities::detail::Detail;

/// An Assembly - owns the details consumed to build it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Unique identifier (ASM-...)
    pub id: ItemId,

    /// Shared attributes
    #[serde(flatten)]
    pub info: ProductInfo,

    /// Details taken out of stock to build this assembly
    #[serde(default)]
    pub details: Vec<Detail>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Item for Assembly {
    const KIND: ProductKind = ProductKind::Assembly;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn info(&self) -> &ProductInfo {
        &self.info
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn extra_field(&self) -> (&'static str, String) {
        ("details", self.component_names())
    }
}

impl Assembly {
    /// Create a new assembly from already-owned details
    pub fn new(info: ProductInfo, details: Vec<Detail>) -> Self {
        Self {
            id: ItemId::new(ProductKind::Assembly),
            info,
            details,
            created: Utc::now(),
        }
    }

    /// Names of the immediate details, comma separated
    pub fn component_names(&self) -> String {
        join_names(self.details.iter().map(|d| d.name()))
    }

    /// Number of immediate details
    pub fn component_count(&self) -> usize {
        self.details.len()
    }
}
