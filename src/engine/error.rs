//! Error types for machine operations.

use thiserror::Error;

use crate::Amount;
use crate::model::UserId;

/// Error returned by [`Engine::money_inserted`](super::Engine::money_inserted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositError {
    #[error("{0} is not a valid amount, deposits must be a positive number of cents")]
    InvalidAmount(Amount),

    #[error("balance for user {0} cannot hold any more money")]
    BalanceOverflow(UserId),
}

/// Reason a soda request did not dispense anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("No product was selected")]
    NoSelection,

    #[error("'{0}' is not a valid selection")]
    InvalidSelection(String),

    #[error("You have not deposited enough money: deposited ${balance:.2}, price ${price:.2}")]
    InsufficientFunds { balance: Amount, price: Amount },

    #[error("Exact change of ${owed:.2} cannot be made, ${remainder:.2} short; please use exact change")]
    ChangeUnavailable { owed: Amount, remainder: Amount },
}

/// Error returned by the price queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("'{0}' is not sold here")]
    UnknownProduct(String),

    #[error("products have different prices, ask for a specific product")]
    AmbiguousPrice,
}

/// Text that names no [`ChangePolicy`](super::ChangePolicy).
#[derive(Debug, Error)]
#[error("unknown change policy '{0}', expected 'exact' or 'best-effort'")]
pub struct ParseChangePolicyError(pub(super) String);
