//! Product - closed variant over the three item kinds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Item, ProductInfo};
use crate::core::identity::{ItemId, ProductKind};
use crate::entities::{Assembly, Detail, Mechanism};

/// Any inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Product {
    Detail(Detail),
    Assembly(Assembly),
    Mechanism(Mechanism),
}

impl Product {
    pub fn kind(&self) -> ProductKind {
        match self {
            Product::Detail(_) => ProductKind::Detail,
            Product::Assembly(_) => ProductKind::Assembly,
            Product::Mechanism(_) => ProductKind::Mechanism,
        }
    }

    pub fn id(&self) -> &ItemId {
        match self {
            Product::Detail(d) => d.id(),
            Product::Assembly(a) => a.id(),
            Product::Mechanism(m) => m.id(),
        }
    }

    pub fn info(&self) -> &ProductInfo {
        match self {
            Product::Detail(d) => d.info(),
            Product::Assembly(a) => a.info(),
            Product::Mechanism(m) => m.info(),
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn created(&self) -> DateTime<Utc> {
        match self {
            Product::Detail(d) => d.created(),
            Product::Assembly(a) => a.created(),
            Product::Mechanism(m) => m.created(),
        }
    }

    /// Material for details, component names for composites
    pub fn extra(&self) -> String {
        match self {
            Product::Detail(d) => d.extra_field().1,
            Product::Assembly(a) => a.extra_field().1,
            Product::Mechanism(m) => m.extra_field().1,
        }
    }

    /// Multi-line description of the item and its immediate components
    pub fn describe(&self) -> String {
        match self {
            Product::Detail(d) => d.describe(),
            Product::Assembly(a) => a.describe(),
            Product::Mechanism(m) => m.describe(),
        }
    }

    /// Immediate components as products (empty for details)
    pub fn components(&self) -> Vec<Product> {
        match self {
            Product::Detail(_) => Vec::new(),
            Product::Assembly(a) => a.details.iter().cloned().map(Product::Detail).collect(),
            Product::Mechanism(m) => m
                .assemblies
                .iter()
                .cloned()
                .map(Product::Assembly)
                .collect(),
        }
    }

    /// IDs of every item built into this one, at any depth
    pub fn contained_ids(&self) -> Vec<ItemId> {
        match self {
            Product::Detail(_) => Vec::new(),
            Product::Assembly(a) => a.details.iter().map(|d| d.id).collect(),
            Product::Mechanism(m) => m
                .assemblies
                .iter()
                .flat_map(|a| std::iter::once(a.id).chain(a.details.iter().map(|d| d.id)))
                .collect(),
        }
    }

    /// Check whether the name contains `query`, ignoring case
    pub fn name_matches(&self, query: &str) -> bool {
        self.name().to_lowercase().contains(&query.to_lowercase())
    }

    pub fn as_detail(&self) -> Option<&Detail> {
        match self {
            Product::Detail(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_assembly(&self) -> Option<&Assembly> {
        match self {
            Product::Assembly(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_mechanism(&self) -> Option<&Mechanism> {
        match self {
            Product::Mechanism(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Detail> for Product {
    fn from(detail: Detail) -> Self {
        Product::Detail(detail)
    }
}

impl From<Assembly> for Product {
    fn from(assembly: Assembly) -> Self {
        Product::Assembly(assembly)
    }
}

impl From<Mechanism> for Product {
    fn from(mechanism: Mechanism) -> Self {
        Product::Mechanism(mechanism)
    }
}
