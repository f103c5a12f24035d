//! Short ID system for easier item selection
//!
//! Provides session-local numeric aliases like `@1`, `@2` that map to full item IDs.
//! Aliases live as long as the warehouse does and are never reused.

use std::collections::HashMap;

use crate::core::identity::ItemId;

/// A mapping of short IDs (@N) to full item IDs
#[derive(Debug, Clone)]
pub struct ShortIdIndex {
    /// Maps short number to full item ID
    entries: HashMap<u32, ItemId>,
    /// Maps full item ID to short number (reverse lookup)
    reverse: HashMap<ItemId, u32>,
    /// Next available short ID
    next_id: u32,
}

impl Default for ShortIdIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortIdIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add an item ID and return its short ID
    pub fn add(&mut self, id: ItemId) -> u32 {
        if let Some(&short_id) = self.reverse.get(&id) {
            return short_id;
        }

        let short_id = self.next_id;
        self.next_id += 1;
        self.entries.insert(short_id, id);
        self.reverse.insert(id, short_id);
        short_id
    }

    /// Drop the alias for an item; the number is not handed out again
    pub fn remove(&mut self, id: &ItemId) -> Option<u32> {
        let short_id = self.reverse.remove(id)?;
        self.entries.remove(&short_id);
        Some(short_id)
    }

    /// Resolve a reference to a full item ID
    ///
    /// Accepts:
    /// - `@N` format (e.g., `@1`, `@42`)
    /// - Plain number (e.g., `1`, `42`)
    /// - Full item ID (e.g., `DET-01J...`), returned as parsed
    pub fn resolve(&self, reference: &str) -> Option<ItemId> {
        let reference = reference.trim();
        if !is_alias(reference) {
            return ItemId::parse(reference).ok();
        }

        reference
            .trim_start_matches('@')
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n).copied())
    }

    /// Get the short ID for a full item ID
    pub fn get_short_id(&self, id: &ItemId) -> Option<u32> {
        self.reverse.get(id).copied()
    }

    /// Format an item ID with its short ID prefix
    pub fn format_with_short_id(&self, id: &ItemId) -> String {
        if let Some(short_id) = self.reverse.get(id) {
            format!("@{:<3} {}", short_id, id)
        } else {
            format!("     {}", id)
        }
    }

    /// Number of live aliases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check whether a reference is written as a short alias (`@N` or `N`)
pub fn is_alias(reference: &str) -> bool {
    let digits = reference.strip_prefix('@').unwrap_or(reference);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::ProductKind;

    #[test]
    fn test_short_id_add_and_resolve() {
        let mut index = ShortIdIndex::new();
        let a = ItemId::new(ProductKind::Detail);
        let b = ItemId::new(ProductKind::Assembly);

        assert_eq!(index.add(a), 1);
        assert_eq!(index.add(b), 2);

        assert_eq!(index.resolve("@1"), Some(a));
        assert_eq!(index.resolve("@2"), Some(b));
        assert_eq!(index.resolve("1"), Some(a));
        assert_eq!(index.resolve("@99"), None);
    }

    #[test]
    fn test_full_id_passthrough() {
        let index = ShortIdIndex::new();
        let id = ItemId::new(ProductKind::Mechanism);

        assert_eq!(index.resolve(&id.to_string()), Some(id));
        assert_eq!(index.resolve("gearbox"), None);
        assert_eq!(index.resolve(""), None);
    }

    #[test]
    fn test_short_id_no_duplicates() {
        let mut index = ShortIdIndex::new();
        let id = ItemId::new(ProductKind::Detail);

        assert_eq!(index.add(id), index.add(id));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_removed_alias_is_not_reused() {
        let mut index = ShortIdIndex::new();
        let a = ItemId::new(ProductKind::Detail);
        let b = ItemId::new(ProductKind::Detail);

        index.add(a);
        assert_eq!(index.remove(&a), Some(1));
        assert_eq!(index.resolve("@1"), None);
        assert_eq!(index.add(b), 2);
        assert_eq!(index.get_short_id(&a), None);
    }

    #[test]
    fn test_is_alias() {
        assert!(is_alias("@3"));
        assert!(is_alias("42"));
        assert!(!is_alias("@"));
        assert!(!is_alias("@x1"));
        assert!(!is_alias("DET-01ABC"));
    }

    #[test]
    fn test_format_with_short_id() {
        let mut index = ShortIdIndex::new();
        let id = ItemId::new(ProductKind::Detail);
        index.add(id);
        assert_eq!(index.format_with_short_id(&id), format!("@1   {}", id));
    }
}
