use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of the product catalog collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub image: String,
    pub category: String,
}

/// Read access to the product catalog.
///
/// The catalog is an external collaborator; this crate only consumes it to
/// display products and to build stock snapshots.
pub trait CatalogClient: Send + Sync {
    fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Network(String),
    Malformed(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(message) => write!(f, "catalog request failed: {}", message),
            CatalogError::Malformed(message) => {
                write!(f, "catalog response malformed: {}", message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}
