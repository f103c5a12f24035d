//! Warehouse - the inventory store
//!
//! Every in-stock item lives in a single arena keyed by [`ItemId`]. Three
//! ordered index sets (details, assemblies, mechanisms) point into the arena,
//! so an item is listed under exactly one kind. Items consumed by a composite
//! leave the arena and are owned by their container from then on.

use miette::Diagnostic;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::entity::ProductInfo;
use crate::core::identity::{IdParseError, ItemId, ProductKind};
use crate::core::shortid::{is_alias, ShortIdIndex};
use crate::entities::{Assembly, Detail, Mechanism, Product};

/// Errors raised by warehouse operations
#[derive(Debug, Error, Diagnostic)]
pub enum WarehouseError {
    #[error("{0} is not in stock")]
    #[diagnostic(
        code(whs::warehouse::not_in_stock),
        help("components must be in stock; items already used in a composite cannot be reused")
    )]
    ComponentNotInStock(ItemId),

    #[error("{id} is not of kind {expected}")]
    #[diagnostic(code(whs::warehouse::wrong_kind))]
    WrongComponentKind { id: ItemId, expected: ProductKind },

    #[error("no in-stock item matches '{0}'")]
    #[diagnostic(
        code(whs::warehouse::unknown_reference),
        help("use an alias like @3 or a full ID; run `stock` to list items")
    )]
    UnknownReference(String),

    #[error(transparent)]
    #[diagnostic(code(whs::warehouse::invalid_id))]
    InvalidId(#[from] IdParseError),
}

/// Per-kind counts and total value of what is in stock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub warehouse: String,
    pub details: usize,
    pub assemblies: usize,
    pub mechanisms: usize,
    /// Sum of prices of in-stock items (consumed components are not counted)
    pub total_value: f64,
}

impl StockSummary {
    pub fn total_items(&self) -> usize {
        self.details + self.assemblies + self.mechanisms
    }
}

/// A named inventory store; the name doubles as the login
#[derive(Debug, Clone)]
pub struct Warehouse {
    name: String,
    items: HashMap<ItemId, Product>,
    details: Vec<ItemId>,
    assemblies: Vec<ItemId>,
    mechanisms: Vec<ItemId>,
    short_ids: ShortIdIndex,
}

impl Warehouse {
    /// Create an empty warehouse
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: HashMap::new(),
            details: Vec::new(),
            assemblies: Vec::new(),
            mechanisms: Vec::new(),
            short_ids: ShortIdIndex::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn index(&self, kind: ProductKind) -> &Vec<ItemId> {
        match kind {
            ProductKind::Detail => &self.details,
            ProductKind::Assembly => &self.assemblies,
            ProductKind::Mechanism => &self.mechanisms,
        }
    }

    fn index_mut(&mut self, kind: ProductKind) -> &mut Vec<ItemId> {
        match kind {
            ProductKind::Detail => &mut self.details,
            ProductKind::Assembly => &mut self.assemblies,
            ProductKind::Mechanism => &mut self.mechanisms,
        }
    }

    /// Put an item into stock under its kind
    ///
    /// Items with the same name may coexist. Buying an item whose ID is
    /// already in stock replaces the stored value without listing it twice.
    /// A composite takes every item it is built from out of stock in the
    /// same step. An item already built into a stocked composite is not
    /// stocked a second time.
    pub fn buy(&mut self, product: impl Into<Product>) -> ItemId {
        let product = product.into();
        let id = *product.id();
        let kind = product.kind();

        if let Some(container) = self.container_of(&id) {
            warn!(
                warehouse = %self.name,
                %id,
                %container,
                "item is already part of a stocked composite"
            );
            return id;
        }

        for component in product.contained_ids() {
            if self.remove(&component).is_some() {
                debug!(warehouse = %self.name, %id, %component, "took component out of stock");
            }
        }

        if self.items.insert(id, product).is_none() {
            self.index_mut(kind).push(id);
        }
        let short_id = self.short_ids.add(id);

        debug!(warehouse = %self.name, %id, short_id, kind = %kind, "bought item");
        id
    }

    /// Remove an item from stock; absent IDs are a no-op
    pub fn sell(&mut self, id: &ItemId) -> Option<Product> {
        let product = self.remove(id)?;
        debug!(warehouse = %self.name, %id, name = product.name(), "sold item");
        Some(product)
    }

    /// Sell every listed item that is in stock
    pub fn sell_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) -> Vec<Product> {
        ids.into_iter().filter_map(|id| self.sell(id)).collect()
    }

    fn remove(&mut self, id: &ItemId) -> Option<Product> {
        let product = self.items.remove(id)?;
        self.index_mut(product.kind()).retain(|other| other != id);
        self.short_ids.remove(id);
        Some(product)
    }

    /// Build an assembly from in-stock details and put it into stock
    ///
    /// Either every detail moves into the new assembly or nothing changes.
    pub fn assemble(
        &mut self,
        info: ProductInfo,
        detail_ids: &[ItemId],
    ) -> Result<ItemId, WarehouseError> {
        let details: Vec<Detail> = self
            .take_components(detail_ids, ProductKind::Detail)?
            .into_iter()
            .filter_map(|p| match p {
                Product::Detail(d) => Some(d),
                _ => None,
            })
            .collect();

        let count = details.len();
        let id = self.buy(Assembly::new(info, details));
        debug!(warehouse = %self.name, %id, components = count, "assembled");
        Ok(id)
    }

    /// Build a mechanism from in-stock assemblies and put it into stock
    ///
    /// Either every assembly moves into the new mechanism or nothing changes.
    pub fn build_mechanism(
        &mut self,
        info: ProductInfo,
        assembly_ids: &[ItemId],
    ) -> Result<ItemId, WarehouseError> {
        let assemblies: Vec<Assembly> = self
            .take_components(assembly_ids, ProductKind::Assembly)?
            .into_iter()
            .filter_map(|p| match p {
                Product::Assembly(a) => Some(a),
                _ => None,
            })
            .collect();

        let count = assemblies.len();
        let id = self.buy(Mechanism::new(info, assemblies));
        debug!(warehouse = %self.name, %id, components = count, "built mechanism");
        Ok(id)
    }

    /// Validate all components first, then move them out of stock
    fn take_components(
        &mut self,
        ids: &[ItemId],
        expected: ProductKind,
    ) -> Result<Vec<Product>, WarehouseError> {
        let mut seen = HashSet::new();
        let unique: Vec<ItemId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        for id in &unique {
            let item = self
                .items
                .get(id)
                .ok_or(WarehouseError::ComponentNotInStock(*id))?;
            if item.kind() != expected {
                return Err(WarehouseError::WrongComponentKind { id: *id, expected });
            }
        }

        Ok(unique.iter().filter_map(|id| self.remove(id)).collect())
    }

    /// The in-stock composite that has `id` built into it
    fn container_of(&self, id: &ItemId) -> Option<ItemId> {
        self.items
            .values()
            .find(|p| p.contained_ids().contains(id))
            .map(|p| *p.id())
    }

    /// Look up an in-stock item
    pub fn get(&self, id: &ItemId) -> Option<&Product> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// In-stock details, in the order they were bought
    pub fn details(&self) -> impl Iterator<Item = &Detail> + '_ {
        self.products(Some(ProductKind::Detail))
            .filter_map(Product::as_detail)
    }

    /// In-stock assemblies, in the order they were bought
    pub fn assemblies(&self) -> impl Iterator<Item = &Assembly> + '_ {
        self.products(Some(ProductKind::Assembly))
            .filter_map(Product::as_assembly)
    }

    /// In-stock mechanisms, in the order they were bought
    pub fn mechanisms(&self) -> impl Iterator<Item = &Mechanism> + '_ {
        self.products(Some(ProductKind::Mechanism))
            .filter_map(Product::as_mechanism)
    }

    /// In-stock items of one kind, or of all kinds (details, assemblies, mechanisms)
    pub fn products(&self, kind: Option<ProductKind>) -> impl Iterator<Item = &Product> + '_ {
        ProductKind::all()
            .iter()
            .copied()
            .filter(move |k| kind.map_or(true, |wanted| wanted == *k))
            .flat_map(move |k| self.index(k).iter())
            .filter_map(move |id| self.items.get(id))
    }

    /// Case-insensitive substring search on item names
    ///
    /// An empty query matches everything.
    pub fn search(&self, kind: Option<ProductKind>, query: &str) -> Vec<&Product> {
        self.products(kind).filter(|p| p.name_matches(query)).collect()
    }

    /// Number of in-stock items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, kind: ProductKind) -> usize {
        self.index(kind).len()
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary {
            warehouse: self.name.clone(),
            details: self.details.len(),
            assemblies: self.assemblies.len(),
            mechanisms: self.mechanisms.len(),
            total_value: self.items.values().fold(0.0, |acc, p| acc + p.info().price),
        }
    }

    /// Resolve `@N`, `N`, or a full item ID to an in-stock item
    pub fn resolve(&self, reference: &str) -> Result<ItemId, WarehouseError> {
        let reference = reference.trim();
        let id = if is_alias(reference) {
            self.short_ids
                .resolve(reference)
                .ok_or_else(|| WarehouseError::UnknownReference(reference.to_string()))?
        } else {
            ItemId::parse(reference)?
        };

        if self.contains(&id) {
            Ok(id)
        } else {
            Err(WarehouseError::UnknownReference(reference.to_string()))
        }
    }

    /// Resolve several references, failing on the first unknown one
    pub fn resolve_all<S: AsRef<str>>(&self, references: &[S]) -> Result<Vec<ItemId>, WarehouseError> {
        references.iter().map(|r| self.resolve(r.as_ref())).collect()
    }

    /// Session alias of an in-stock item
    pub fn short_id(&self, id: &ItemId) -> Option<u32> {
        self.short_ids.get_short_id(id)
    }
}
