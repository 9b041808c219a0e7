//! Products and change denominations available to the machine.

use std::collections::HashSet;

use thiserror::Error;

use crate::csv::CsvError;
use crate::model::{Denomination, Product};

/// Read-only source of the products on sale and the denominations used for change.
pub trait CatalogStore {
    /// Products in a stable order.
    fn products(&self) -> &[Product];

    /// Denominations ordered by descending value.
    fn denominations(&self) -> &[Denomination];

    fn find(&self, name: &str) -> Option<&Product> {
        self.products().iter().find(|p| p.name == name)
    }
}

/// Errors raised while building a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no products")]
    Empty,

    #[error("product name must not be blank")]
    BlankName,

    #[error("duplicate product '{0}'")]
    DuplicateProduct(String),

    #[error("product '{0}' must have a positive price")]
    NonPositivePrice(String),

    #[error("denomination '{0}' must have a positive value")]
    NonPositiveDenomination(String),

    #[error(transparent)]
    Csv(#[from] CsvError),
}

/// In-memory catalog, validated once on construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    denominations: Vec<Denomination>,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        mut denominations: Vec<Denomination>,
    ) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for product in &products {
            if product.name.trim().is_empty() {
                return Err(CatalogError::BlankName);
            }
            if !product.price.is_positive() {
                return Err(CatalogError::NonPositivePrice(product.name.clone()));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.name.clone()));
            }
        }

        if let Some(bad) = denominations.iter().find(|d| !d.value.is_positive()) {
            return Err(CatalogError::NonPositiveDenomination(bad.name.clone()));
        }
        // stable: equal values keep file order
        denominations.sort_by(|a, b| b.value.cmp(&a.value));

        Ok(Self {
            products,
            denominations,
        })
    }
}

impl CatalogStore for Catalog {
    fn products(&self) -> &[Product] {
        &self.products
    }

    fn denominations(&self) -> &[Denomination] {
        &self.denominations
    }
}
