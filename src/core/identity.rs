//! Item identity system using kind-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// The three kinds of inventory items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Leaf part with a material
    Detail,
    /// Built from details
    Assembly,
    /// Built from assemblies
    Mechanism,
}

impl ProductKind {
    /// Get the ID prefix for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Detail => "DET",
            ProductKind::Assembly => "ASM",
            ProductKind::Mechanism => "MECH",
        }
    }

    /// Human-readable label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Detail => "Detail",
            ProductKind::Assembly => "Assembly",
            ProductKind::Mechanism => "Mechanism",
        }
    }

    /// Plural label for section headings
    pub fn plural(&self) -> &'static str {
        match self {
            ProductKind::Detail => "Details",
            ProductKind::Assembly => "Assemblies",
            ProductKind::Mechanism => "Mechanisms",
        }
    }

    /// The kind a composite of this kind is built from
    pub fn component_kind(&self) -> Option<ProductKind> {
        match self {
            ProductKind::Detail => None,
            ProductKind::Assembly => Some(ProductKind::Detail),
            ProductKind::Mechanism => Some(ProductKind::Assembly),
        }
    }

    /// All kinds, in listing order
    pub fn all() -> &'static [ProductKind] {
        &[
            ProductKind::Detail,
            ProductKind::Assembly,
            ProductKind::Mechanism,
        ]
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProductKind {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "det" | "detail" => Ok(ProductKind::Detail),
            "asm" | "assembly" => Ok(ProductKind::Assembly),
            "mech" | "mechanism" => Ok(ProductKind::Mechanism),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique item identifier combining a kind prefix and ULID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    kind: ProductKind,
    ulid: Ulid,
}

impl ItemId {
    /// Create a new ItemId for the given kind
    pub fn new(kind: ProductKind) -> Self {
        Self {
            kind,
            ulid: Ulid::new(),
        }
    }

    /// Create an ItemId from a kind and existing ULID
    pub fn from_parts(kind: ProductKind, ulid: Ulid) -> Self {
        Self { kind, ulid }
    }

    /// The kind encoded in the prefix
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse an ItemId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.ulid)
    }
}

impl FromStr for ItemId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let kind = match prefix_str.to_uppercase().as_str() {
            "DET" => ProductKind::Detail,
            "ASM" => ProductKind::Assembly,
            "MECH" => ProductKind::Mechanism,
            _ => return Err(IdParseError::InvalidPrefix(prefix_str.to_string())),
        };
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { kind, ulid })
    }
}

impl Serialize for ItemId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing item IDs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("invalid item prefix: '{0}' (valid: DET, ASM, MECH)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in item ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}
