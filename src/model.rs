//! Core domain types for the soda machine.

use crate::Amount;
use crate::engine::PurchaseError;

/// User identifier; one balance is kept per id.
pub type UserId = String;

/// A purchasable product and its price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Amount,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Amount) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// A coin or note the machine can hand back as change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    pub name: String,
    pub value: Amount,
}

impl Denomination {
    pub fn new(name: impl Into<String>, value: Amount) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Outcome of a single soda request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionResult {
    /// The dispensed product, absent on failure.
    pub soda: Option<Product>,
    /// Change handed back, highest value first.
    pub change: Vec<Denomination>,
    pub error: Option<PurchaseError>,
}

impl TransactionResult {
    pub fn dispensed(soda: Product, change: Vec<Denomination>) -> Self {
        Self {
            soda: Some(soda),
            change,
            error: None,
        }
    }

    pub fn failed(error: PurchaseError) -> Self {
        Self {
            soda: None,
            change: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The error text, or an empty string when the request succeeded.
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn change_total(&self) -> Amount {
        self.change.iter().map(|coin| coin.value).sum()
    }
}
