use std::collections::HashMap;
use std::sync::RwLock;

use crate::catalog::{CatalogClient, CatalogError};

/// Point-in-time read of per-product available inventory.
///
/// The snapshot is a best-effort client-side guard, not a reservation: it is
/// refreshed on demand from the catalog and consulted before cart mutations.
/// A failed refresh leaves the previous snapshot in place, and a product the
/// snapshot has never seen is not constrained.
#[derive(Default)]
pub struct StockOracle {
    levels: RwLock<HashMap<String, u32>>,
}

impl StockOracle {
    pub fn new() -> Self {
        StockOracle::default()
    }

    /// Refresh the snapshot from the catalog. Returns the number of products
    /// seen. On error the previous snapshot stays in place.
    pub fn load_from<C: CatalogClient + ?Sized>(&self, catalog: &C) -> Result<usize, CatalogError> {
        let products = catalog.fetch_products()?;
        let count = products.len();

        let next: HashMap<String, u32> = products
            .into_iter()
            .map(|product| (product.id, product.quantity))
            .collect();

        if let Ok(mut levels) = self.levels.write() {
            *levels = next;
        }

        Ok(count)
    }

    /// Seed levels directly. Used by tests and by callers that already hold
    /// catalog data.
    pub fn set_levels(&self, levels: HashMap<String, u32>) {
        if let Ok(mut current) = self.levels.write() {
            *current = levels;
        }
    }

    pub fn available(&self, id: &str) -> Option<u32> {
        self.levels
            .read()
            .ok()
            .and_then(|levels| levels.get(id).copied())
    }

    /// Whether the snapshot permits the requested quantity. Products absent
    /// from the snapshot are not constrained.
    pub fn allows(&self, id: &str, quantity: u32) -> bool {
        match self.available(id) {
            Some(available) => quantity <= available,
            None => true,
        }
    }

    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.levels
            .read()
            .map(|levels| levels.clone())
            .unwrap_or_default()
    }
}
