use std::sync::{Arc, RwLock};

use crate::error::StorageError;
use crate::record::StoredRecord;
use crate::storage::Storage;

use super::LineItem;

const CART_KEY: &str = "greencart.cart";
const CART_RECORD: &str = "Cart";

/// The cart: line items owned exclusively by this store.
///
/// Every mutation persists the full snapshot to durable client storage, and
/// `open` rehydrates from the same key, so the cart survives page reloads.
/// A missing or malformed record rehydrates as an empty cart.
pub struct CartStore<S> {
    storage: Arc<S>,
    items: RwLock<Vec<LineItem>>,
}

impl<S: Storage> CartStore<S> {
    pub fn open(storage: Arc<S>) -> Self {
        let items = rehydrate(storage.as_ref());
        CartStore {
            storage,
            items: RwLock::new(items),
        }
    }

    /// Increment the quantity for an existing product, or insert it at
    /// quantity 1.
    pub fn add(&self, item: LineItem) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::LockPoisoned("cart write"))?;

        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity += 1,
            None => items.push(LineItem { quantity: 1, ..item }),
        }

        self.persist(&items)
    }

    /// Remove a line item. No-op when the id is not in the cart.
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::LockPoisoned("cart write"))?;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(());
        }

        self.persist(&items)
    }

    /// Set a line item's quantity verbatim. A quantity below 1 removes the
    /// item. Stock-bound validation is the caller's responsibility.
    pub fn update_quantity(&self, id: &str, quantity: u32) -> Result<(), StorageError> {
        if quantity < 1 {
            return self.remove(id);
        }

        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::LockPoisoned("cart write"))?;

        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.quantity = quantity,
            None => return Ok(()),
        }

        self.persist(&items)
    }

    /// Empty the cart. Called on payment success.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::LockPoisoned("cart write"))?;
        items.clear();
        self.persist(&items)
    }

    /// Sum of price times quantity over current line items, computed fresh
    /// on every read.
    pub fn total_price(&self) -> Result<f64, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned("cart read"))?;
        Ok(items.iter().map(LineItem::subtotal).sum())
    }

    pub fn items(&self) -> Result<Vec<LineItem>, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned("cart read"))?;
        Ok(items.clone())
    }

    pub fn quantity_of(&self, id: &str) -> Result<u32, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned("cart read"))?;
        Ok(items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
            .unwrap_or(0))
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let items = self
            .items
            .read()
            .map_err(|_| StorageError::LockPoisoned("cart read"))?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn persist(&self, items: &[LineItem]) -> Result<(), StorageError> {
        let record = StoredRecord::encode(CART_RECORD, &items.to_vec())?;
        self.storage.set(CART_KEY, &record.to_json()?)
    }
}

fn rehydrate<S: Storage>(storage: &S) -> Vec<LineItem> {
    let raw = match storage.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        _ => return Vec::new(),
    };

    StoredRecord::from_json(&raw)
        .and_then(|record| record.decode::<Vec<LineItem>>())
        .unwrap_or_default()
}
