//! Detail entity - leaf parts with a material

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Item, ProductInfo};
use crate::core::identity::{ItemId, ProductKind};

/// A Detail - atomic physical part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    /// Unique identifier (DET-...)
    pub id: ItemId,

    /// Shared attributes
    #[serde(flatten)]
    pub info: ProductInfo,

    /// Material the part is made of
    pub material: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Item for Detail {
    const KIND: ProductKind = ProductKind::Detail;

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
        ("material", self.material.clone())
    }
}

impl Detail {
    /// Create a new detail with a fresh ID
    pub fn new(info: ProductInfo, material: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(ProductKind::Detail),
            info,
            material: material.into(),
            created: Utc::now(),
        }
    }
}
