//! Soda machine transaction engine.
//!
//! The engine keeps the money each user has deposited, validates soda
//! requests against the catalog and computes the change to hand back.
//! It never performs I/O: front ends call one operation per user action and
//! present the result themselves.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::Amount;
use crate::catalog::{Catalog, CatalogStore};
use crate::model::{Denomination, Product, TransactionResult, UserId};

mod change;
pub use change::{Change, make_change};

mod state;
pub use state::UserBalance;

mod error;
pub use error::{DepositError, ParseChangePolicyError, PriceError, PurchaseError};

/// What to do when the owed change cannot be paid exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangePolicy {
    /// Refuse the sale and keep the balance.
    #[default]
    Exact,
    /// Dispense anyway with whatever change can be made.
    BestEffort,
}

impl FromStr for ChangePolicy {
    type Err = ParseChangePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(ChangePolicy::Exact),
            "best-effort" | "best_effort" => Ok(ChangePolicy::BestEffort),
            other => Err(ParseChangePolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for ChangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangePolicy::Exact => f.write_str("exact"),
            ChangePolicy::BestEffort => f.write_str("best-effort"),
        }
    }
}

/// The soda machine engine.
///
/// Owns the catalog and one balance per user.
pub struct Engine<C: CatalogStore = Catalog> {
    catalog: C,
    policy: ChangePolicy,
    /// Users with no entry have a zero balance
    balances: HashMap<UserId, UserBalance>,
}

/// Public API
impl<C: CatalogStore> Engine<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_policy(catalog, ChangePolicy::default())
    }

    pub fn with_policy(catalog: C, policy: ChangePolicy) -> Self {
        Self {
            catalog,
            policy,
            balances: HashMap::new(),
        }
    }

    pub fn policy(&self) -> ChangePolicy {
        self.policy
    }

    /// Products on sale, in catalog order.
    pub fn list_types_of_soda(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Denominations used for change, highest value first.
    pub fn denominations(&self) -> &[Denomination] {
        self.catalog.denominations()
    }

    /// The price of a soda when every product costs the same.
    pub fn soda_price(&self) -> Result<Amount, PriceError> {
        let mut prices = self.catalog.products().iter().map(|p| p.price);
        let first = prices.next().ok_or(PriceError::AmbiguousPrice)?;
        if prices.all(|price| price == first) {
            Ok(first)
        } else {
            Err(PriceError::AmbiguousPrice)
        }
    }

    /// The price of one named product.
    pub fn price_of(&self, name: &str) -> Result<Amount, PriceError> {
        self.catalog
            .find(name)
            .map(|p| p.price)
            .ok_or_else(|| PriceError::UnknownProduct(name.to_string()))
    }

    /// Add money to a user's balance, returning the new balance.
    pub fn money_inserted(&mut self, user: &str, amount: Amount) -> Result<Amount, DepositError> {
        let result = self.apply_deposit(user, amount);
        Self::log_result("deposit", user, Some(amount), &result);
        result
    }

    /// Money deposited by `user` and not yet spent; zero for unknown users.
    pub fn money_inserted_total(&self, user: &str) -> Amount {
        self.balances
            .get(user)
            .map(UserBalance::deposited)
            .unwrap_or_default()
    }

    /// Hand back everything `user` has deposited. Refunding an empty balance is a no-op.
    pub fn issue_full_refund(&mut self, user: &str) {
        let refunded = self
            .balances
            .remove(user)
            .map(|balance| balance.deposited())
            .unwrap_or_default();
        info!(user, amount = %refunded, "refund applied");
    }

    /// Sell `soda` to `user`.
    ///
    /// On success the whole balance is spent: the product is dispensed and
    /// everything above its price comes back as change. Failures leave the
    /// balance untouched.
    pub fn request_soda(&mut self, soda: Option<&Product>, user: &str) -> TransactionResult {
        let price = soda.map(|s| s.price);
        let result = self.apply_purchase(soda, user);
        Self::log_result("purchase", user, price, &result);
        match result {
            Ok((soda, change)) => TransactionResult::dispensed(soda, change),
            Err(err) => TransactionResult::failed(err),
        }
    }
}

/// Private API
impl<C: CatalogStore> Engine<C> {
    /// Small helper to log operation results
    fn log_result<T, E: fmt::Display>(
        op: &str,
        user: &str,
        amount: Option<Amount>,
        result: &Result<T, E>,
    ) {
        match (result, amount) {
            (Ok(_), Some(amt)) => info!(user, amount = %amt, "{op} applied"),
            (Ok(_), None) => info!(user, "{op} applied"),
            (Err(e), Some(amt)) => info!(user, amount = %amt, reason = %e, "{op} skipped"),
            (Err(e), None) => info!(user, reason = %e, "{op} skipped"),
        }
    }

    /// Credit a user's balance:
    /// - Ensure the amount is a positive number of whole cents
    /// - Ensure the new balance is representable
    fn apply_deposit(&mut self, user: &str, amount: Amount) -> Result<Amount, DepositError> {
        if !amount.is_positive() || !amount.is_whole_cents() {
            return Err(DepositError::InvalidAmount(amount));
        }

        self.balances
            .entry(user.to_string())
            .or_default()
            .credit(amount)
            .ok_or_else(|| DepositError::BalanceOverflow(user.to_string()))
    }

    /// Sell a soda:
    /// - Ensure the selection is a catalog product
    /// - Ensure the balance covers the price
    /// - Compute change for the whole balance above the price
    /// - Spend the balance
    fn apply_purchase(
        &mut self,
        soda: Option<&Product>,
        user: &str,
    ) -> Result<(Product, Vec<Denomination>), PurchaseError> {
        let soda = match soda {
            Some(soda) if self.catalog.products().contains(soda) => soda,
            Some(soda) => return Err(PurchaseError::InvalidSelection(soda.name.clone())),
            None => return Err(PurchaseError::NoSelection),
        };

        let balance = self.money_inserted_total(user);
        if balance < soda.price {
            return Err(PurchaseError::InsufficientFunds {
                balance,
                price: soda.price,
            });
        }

        let owed = balance - soda.price;
        let change = make_change(owed, self.catalog.denominations());
        if !change.is_exact() {
            match self.policy {
                ChangePolicy::Exact => {
                    return Err(PurchaseError::ChangeUnavailable {
                        owed,
                        remainder: change.remainder,
                    });
                }
                ChangePolicy::BestEffort => {
                    warn!(
                        user,
                        owed = %owed,
                        short = %change.remainder,
                        "exact change unavailable, returning partial change"
                    );
                }
            }
        }

        self.balances.remove(user);

        Ok((soda.clone(), change.coins))
    }
}
