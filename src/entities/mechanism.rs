//! Mechanism entity - products built from assemblies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{join_names, Item, ProductInfo};
use crate::core::identity::{ItemId, ProductKind};
use crate::entities::assembly::Assembly;

/// A Mechanism - owns the assemblies consumed to build it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanism {
    /// Unique identifier (MECH-...)
    pub id: ItemId,

    /// Shared attributes
    #[serde(flatten)]
    pub info: ProductInfo,

    /// Assemblies taken out of stock to build this mechanism
    #[serde(default)]
    pub assemblies: Vec<Assembly>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Item for Mechanism {
    const KIND: ProductKind = ProductKind::Mechanism;

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
        ("assemblies", self.component_names())
    }
}

impl Mechanism {
    /// Create a new mechanism from already-owned assemblies
    pub fn new(info: ProductInfo, assemblies: Vec<Assembly>) -> Self {
        Self {
            id: ItemId::new(ProductKind::Mechanism),
            info,
            assemblies,
            created: Utc::now(),
        }
    }

    /// Names of the immediate assemblies, comma separated
    pub fn component_names(&self) -> String {
        join_names(self.assemblies.iter().map(|a| a.name()))
    }

    /// Number of immediate assemblies
    pub fn component_count(&self) -> usize {
        self.assemblies.len()
    }

    /// Total details across all assemblies
    pub fn detail_count(&self) -> usize {
        self.assemblies.iter().map(Assembly::component_count).sum()
    }
}
